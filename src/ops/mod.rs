//! High-level operations.

pub mod bob_build;

pub use bob_build::build;
