//! Build engine: path rules, object naming, staleness, dispatch, and the
//! per-platform library builder.

pub mod errors;
pub mod fingerprint;
pub mod freshness;
pub mod library;
pub mod registry;
pub mod rules;
pub mod toolchain;

pub use errors::{BuildError, BuildResult};
pub use library::{BuildSummary, LibraryBuilder, Manifest};
pub use registry::{BuildRoutine, BuildTargetRegistry};
pub use rules::{RuleOp, RuleSet};
