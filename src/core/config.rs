//! The validated build configuration handed to the engine.

use std::path::{Path, PathBuf};

use crate::builder::errors::{BuildError, BuildResult};
use crate::core::platform::{Compiler, Platform};

/// Default free-form D compiler options.
pub const DEFAULT_FLAGS: &str = "-release";

/// Name of the package subtree below the root path.
pub const LIBRARY_ROOT: &str = "tango";

/// Everything the engine needs to know about one build run.
///
/// The engine only reads this; the CLI layer assembles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Echo every command line.
    pub verbose: bool,
    /// Dry run: log commands without executing them.
    pub inhibit: bool,
    /// Accepted for compatibility; user modules are not part of the library.
    pub include_user_modules: bool,
    /// Runtime-support flavour compiled into the core.
    pub runtime: Compiler,
    /// Compiler used for the D sources.
    pub compiler: Compiler,
    /// Opaque D compiler options, also folded into object names.
    pub flags: String,
    /// Library base name, without extension.
    pub library_name: String,
    /// Target platform.
    pub platform: Platform,
    /// Whether `tango/core` (and its C/assembly helpers) is built.
    pub build_core: bool,
    /// Directory containing the `tango` subtree.
    pub root: PathBuf,
    /// Whether the platform came from an explicit package filter.
    pub filter_explicitly_set: bool,
    /// Only rebuild objects older than their sources.
    pub quick: bool,
    /// Where objects and the library are written. Empty means the current
    /// directory.
    pub output_dir: PathBuf,
}

impl BuildConfig {
    /// Configuration with the stock defaults for `platform`.
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        BuildConfig {
            verbose: false,
            inhibit: false,
            include_user_modules: false,
            runtime: Compiler::default(),
            compiler: Compiler::default(),
            flags: DEFAULT_FLAGS.to_string(),
            library_name: platform.default_library_name().to_string(),
            platform,
            build_core: true,
            root: root.into(),
            filter_explicitly_set: false,
            quick: false,
            output_dir: PathBuf::new(),
        }
    }

    /// Path of the library this run produces.
    pub fn library_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}",
            self.library_name,
            self.platform.library_extension()
        ))
    }

    /// The `<root>/tango` directory that gets scanned.
    pub fn library_root(&self) -> PathBuf {
        self.root.join(LIBRARY_ROOT)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> BuildResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(BuildError::config("No output directory given"));
        }
        check_dir(&self.root, "root path")?;
        check_dir(&self.library_root(), "library subtree")?;

        if self.library_name.is_empty() {
            return Err(BuildError::config("library name must not be empty"));
        }
        Ok(())
    }
}

fn check_dir(path: &Path, what: &str) -> BuildResult<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BuildError::config(format!(
            "{} `{}` is not a directory",
            what,
            path.display()
        ))),
        Err(_) => Err(BuildError::config(format!(
            "{} `{}` does not exist",
            what,
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("/src", Platform::Linux);
        assert_eq!(config.compiler, Compiler::Dmd);
        assert_eq!(config.runtime, Compiler::Dmd);
        assert_eq!(config.flags, "-release");
        assert!(config.build_core);
        assert!(!config.quick);
        assert_eq!(config.library_path(), PathBuf::from("libtango.a"));
    }

    #[test]
    fn test_windows_library_path() {
        let mut config = BuildConfig::new("C:/src", Platform::Windows);
        config.output_dir = PathBuf::from("out");
        assert_eq!(config.library_path(), PathBuf::from("out").join("tango.lib"));
    }

    #[test]
    fn test_validate_accepts_tango_tree() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("tango")).unwrap();

        BuildConfig::new(tmp.path(), Platform::Linux).validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_missing_subtree() {
        let tmp = TempDir::new().unwrap();

        let err = BuildConfig::new(tmp.path(), Platform::Linux).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("library subtree"));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = BuildConfig::new(tmp.path().join("nope"), Platform::Linux)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = BuildConfig::new("", Platform::Linux).validate().unwrap_err();
        assert!(err.is_configuration());
    }
}
