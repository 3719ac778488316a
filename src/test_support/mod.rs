//! Test utilities and mocks for the build engine's unit tests.
//!
//! [`MockExecutor`] stands in for the host toolchain: it records each
//! command line and, unless told otherwise, creates the object or archive
//! the command names, so the manifest logic sees real files on disk.

pub mod fixtures;

use std::fs;
use std::path::PathBuf;

pub use fixtures::*;

use crate::builder::errors::{BuildError, BuildResult};
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Recording command runner.
#[derive(Debug, Default)]
pub struct MockExecutor {
    calls: Vec<String>,
    create_outputs: bool,
    fail: Option<(String, i32)>,
    captured_list: Option<String>,
}

impl MockExecutor {
    /// A runner whose commands all succeed and produce their outputs.
    pub fn new() -> Self {
        MockExecutor {
            create_outputs: true,
            ..Default::default()
        }
    }

    /// Succeed without producing any files.
    pub fn without_outputs(mut self) -> Self {
        self.create_outputs = false;
        self
    }

    /// Fail every invocation of `program` with exit status `code`.
    pub fn failing_on(mut self, program: &str, code: i32) -> Self {
        self.fail = Some((program.to_string(), code));
        self
    }

    /// All command lines run so far.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Command lines whose program is `program`.
    pub fn calls_to(&self, program: &str) -> Vec<String> {
        self.calls
            .iter()
            .filter(|c| c.split(' ').next() == Some(program))
            .cloned()
            .collect()
    }

    /// Contents of the last librarian response file seen.
    pub fn captured_list(&self) -> Option<&str> {
        self.captured_list.as_deref()
    }

    fn output_of(cmd: &ProcessBuilder) -> Option<PathBuf> {
        let program = cmd.get_program().to_string_lossy();
        match program.as_ref() {
            "ar" => cmd.get_args().get(1).map(PathBuf::from),
            _ => cmd.get_args().iter().find_map(|arg| {
                arg.strip_prefix("-of")
                    .or_else(|| arg.strip_prefix("-o"))
                    .filter(|rest| !rest.is_empty())
                    .map(PathBuf::from)
            }),
        }
    }
}

impl CommandRunner for MockExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> BuildResult<()> {
        let line = cmd.display_command();
        self.calls.push(line.clone());

        if let Some((program, code)) = &self.fail {
            if cmd.get_program().to_string_lossy() == program.as_str() {
                return Err(BuildError::ExternalProcess {
                    command: line,
                    exit_code: Some(*code),
                    stderr: String::new(),
                });
            }
        }

        if cmd.get_program().to_string_lossy() == "lib" {
            if let Some(list) = cmd.get_args().first().and_then(|a| a.strip_prefix('@')) {
                self.captured_list = fs::read_to_string(list).ok();
            }
            return Ok(());
        }

        if self.create_outputs {
            if let Some(output) = Self::output_of(cmd) {
                fs::write(&output, b"").map_err(|e| BuildError::io(&output, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_records_and_creates_objects() {
        let tmp = TempDir::new().unwrap();
        let object = tmp.path().join("x.o");
        let mut exec = MockExecutor::new();

        exec.run(&ProcessBuilder::new("dmd").arg("-c").arg(format!("-of{}", object.display())).arg("x.d"))
            .unwrap();

        assert!(object.exists());
        assert_eq!(exec.calls_to("dmd").len(), 1);
        assert!(exec.calls_to("gcc").is_empty());
    }

    #[test]
    fn test_mock_failure() {
        let mut exec = MockExecutor::new().failing_on("ar", 2);
        let err = exec.run(&ProcessBuilder::new("ar").arg("-r").arg("lib.a")).unwrap_err();
        assert!(matches!(err, BuildError::ExternalProcess { exit_code: Some(2), .. }));
    }
}
