//! Build error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::platform::{Compiler, Platform};
use crate::util::diagnostic::Diagnostic;

/// Error raised by the build engine.
///
/// The first error aborts the whole run; object files produced before it
/// stay on disk.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("{message}")]
    #[diagnostic(code(bob::config), help("Use the `-h' flag for help."))]
    Configuration { message: String },

    #[error("Unsupported combination of {platform} and {compiler}")]
    #[diagnostic(
        code(bob::target::unsupported),
        help("Pick another compiler with `-c`, or another package filter with `-p`")
    )]
    UnsupportedTarget {
        platform: Platform,
        compiler: Compiler,
    },

    #[error("`{command}` returned {} exit status", display_code(.exit_code))]
    #[diagnostic(code(bob::process::failed))]
    ExternalProcess {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to spawn `{command}`")]
    #[diagnostic(
        code(bob::process::spawn),
        help("Check that the tool is installed and on PATH")
    )]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exclusion rule `{rule}`")]
    #[diagnostic(code(bob::rules::invalid))]
    InvalidRule {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("i/o error on {}", .path.display())]
    #[diagnostic(code(bob::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "no".to_string(),
    }
}

/// Result alias for the build engine.
pub type BuildResult<T> = Result<T, BuildError>;

impl BuildError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        BuildError::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for an I/O error on a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the reporter should print usage help alongside the message.
    pub fn is_configuration(&self) -> bool {
        matches!(self, BuildError::Configuration { .. })
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());

        match self {
            BuildError::ExternalProcess {
                command, stderr, ..
            } => {
                diag = diag.with_context(format!("line was: {}", command));
                for line in stderr.lines().filter(|l| !l.trim().is_empty()).take(20) {
                    diag = diag.with_context(line.to_string());
                }
            }
            BuildError::Spawn { source, .. } | BuildError::Io { source, .. } => {
                diag = diag.with_context(source.to_string());
            }
            BuildError::InvalidRule { source, .. } => {
                diag = diag.with_context(source.to_string());
            }
            BuildError::Configuration { .. } | BuildError::UnsupportedTarget { .. } => {}
        }

        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }

        diag
    }
}
