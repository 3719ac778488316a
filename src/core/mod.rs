//! Core data types.

pub mod config;
pub mod platform;

pub use config::BuildConfig;
pub use platform::{Compiler, Platform};
