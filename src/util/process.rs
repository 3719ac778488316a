//! Subprocess execution.
//!
//! Commands are built as token lists and never pass through a shell. The
//! working directory of a child is set on the child itself, so the parent's
//! current directory is never changed.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::builder::errors::{BuildError, BuildResult};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory for the child only.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let program = which::which(&self.program).unwrap_or_else(|_| self.program.clone());
        let mut cmd = Command::new(program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion.
    pub fn exec(&self) -> BuildResult<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output().map_err(|source| BuildError::Spawn {
            command: self.display_command(),
            source,
        })
    }

    /// Execute and require a zero exit status.
    pub fn exec_and_check(&self) -> BuildResult<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            return Err(BuildError::ExternalProcess {
                command: self.display_command(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output)
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Something that can run external commands for the build engine.
///
/// The engine only ever talks to this trait so that tests can observe the
/// command stream without a D toolchain installed.
pub trait CommandRunner {
    /// Run `cmd` to completion, failing on a non-zero exit status.
    fn run(&mut self, cmd: &ProcessBuilder) -> BuildResult<()>;

    /// Whether commands are only logged, never executed.
    fn is_inhibited(&self) -> bool {
        false
    }
}

/// Runs commands sequentially on the host.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    verbose: bool,
    inhibit: bool,
}

impl ProcessRunner {
    /// Create a runner.
    ///
    /// With `inhibit` set, commands are logged (when `verbose`) but never
    /// executed, and every invocation is treated as successful.
    pub fn new(verbose: bool, inhibit: bool) -> Self {
        ProcessRunner { verbose, inhibit }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> BuildResult<()> {
        let line = cmd.display_command();
        if self.verbose {
            tracing::info!("{}", line);
        } else {
            tracing::debug!("{}", line);
        }

        if self.inhibit {
            return Ok(());
        }

        let output = cmd.exec_and_check()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("{}", stdout.trim_end());
        }
        Ok(())
    }

    fn is_inhibited(&self) -> bool {
        self.inhibit
    }
}
