//! On-disk source tree fixtures.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

/// A throwaway Tango checkout: `<tmp>/src/tango/...` plus an `<tmp>/out`
/// directory for objects.
pub struct TangoTree {
    tmp: TempDir,
}

impl TangoTree {
    /// Create an empty tree with the `tango` subtree in place.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(tmp.path().join("src").join("tango")).expect("create tango dir");
        fs::create_dir_all(tmp.path().join("out")).expect("create out dir");
        TangoTree { tmp }
    }

    /// Add a source file at `rel` (relative to the root, e.g. `tango/io/Stdout.d`).
    pub fn with_source(self, rel: &str) -> Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source dir");
        }
        fs::write(&path, format!("// {}\n", rel)).expect("write source");
        self
    }

    /// Root path handed to the builder.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("src")
    }

    /// Directory objects and the library are written to.
    pub fn out_dir(&self) -> PathBuf {
        self.tmp.path().join("out")
    }

    /// Create `path` if needed and set its modification time.
    pub fn touch(&self, path: &Path, time: SystemTime) {
        if !path.exists() {
            fs::write(path, b"").expect("create file");
        }
        File::options()
            .write(true)
            .open(path)
            .and_then(|f| f.set_modified(time))
            .expect("set mtime");
    }
}

impl Default for TangoTree {
    fn default() -> Self {
        Self::new()
    }
}
