//! Bob - builds the Tango library for D.
//!
//! This crate provides the build engine behind the `bob` binary: path
//! filtering per target, object naming, timestamp-based incremental
//! compilation, and dispatch to the per-platform build routine.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only compiled for tests. Provides a recording command runner and a
/// throwaway source tree fixture.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildError, BuildSummary, BuildTargetRegistry, LibraryBuilder, RuleSet};
pub use crate::core::{BuildConfig, Compiler, Platform};
pub use crate::util::process::{CommandRunner, ProcessRunner};
