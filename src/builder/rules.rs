//! Path exclusion rules.
//!
//! A [`RuleSet`] is the replay of an ordered list of [`RuleOp`]s. Each
//! excluded entry is a regular expression that is matched *anywhere* in the
//! full source path, so `tango/sys/linux` also excludes
//! `/src/tango/sys/linuxish/x.d`. `include` only removes an identical,
//! previously excluded entry; it never punches a hole in a broader one.

use regex::Regex;

use crate::builder::errors::{BuildError, BuildResult};
use crate::core::platform::{Compiler, Platform};

/// Core runtime subtree, dropped when the core is not being built.
pub const CORE_DIR: &str = "tango/core";

/// Subtrees excluded for every target before per-target re-inclusion.
pub const STANDARD_EXCLUSIONS: &[&str] = &[
    "tango/net/cluster",
    "tango/io/protocol",
    "tango/sys/win32",
    "tango/sys/darwin",
    "tango/sys/freebsd",
    "tango/sys/linux",
    "tango/sys/solaris",
    "tango/core/rt/gc/stub",
    "tango/core/rt/compiler/dmd",
    "tango/core/rt/compiler/gdc",
    "tango/core/rt/compiler/ldc",
];

/// POSIX compatibility bindings, meaningless on Windows.
pub const POSIX_STDC_DIR: &str = "tango/stdc/posix";

/// Runtime-support subtree for a compiler.
pub fn runtime_dir(compiler: Compiler) -> String {
    format!("tango/core/rt/compiler/{}", compiler)
}

/// A single rule-set edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOp {
    Exclude(String),
    Include(String),
}

impl RuleOp {
    pub fn exclude(path: impl Into<String>) -> Self {
        RuleOp::Exclude(path.into())
    }

    pub fn include(path: impl Into<String>) -> Self {
        RuleOp::Include(path.into())
    }
}

#[derive(Debug, Clone)]
struct Exclusion {
    rule: String,
    pattern: Regex,
}

/// The set of currently excluded path prefixes.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    excluded: Vec<Exclusion>,
}

impl RuleSet {
    /// Create an empty rule set; nothing is excluded.
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Build a rule set by replaying `ops` in order.
    pub fn from_ops<'a>(ops: impl IntoIterator<Item = &'a RuleOp>) -> BuildResult<Self> {
        let mut rules = RuleSet::new();
        rules.apply_all(ops)?;
        Ok(rules)
    }

    /// The standard rule set for a target platform.
    pub fn for_target(platform: Platform, runtime: Compiler, build_core: bool) -> BuildResult<Self> {
        RuleSet::from_ops(&target_ops(platform, runtime, build_core))
    }

    /// Replay further operations on top of the current state.
    pub fn apply_all<'a>(&mut self, ops: impl IntoIterator<Item = &'a RuleOp>) -> BuildResult<()> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: &RuleOp) -> BuildResult<()> {
        match op {
            RuleOp::Exclude(path) => self.exclude(path),
            RuleOp::Include(path) => {
                self.include(path);
                Ok(())
            }
        }
    }

    /// Mark `path` as excluded. Excluding the same text twice is a no-op.
    pub fn exclude(&mut self, path: &str) -> BuildResult<()> {
        if self.excluded.iter().any(|e| e.rule == path) {
            return Ok(());
        }

        let pattern = Regex::new(path).map_err(|source| BuildError::InvalidRule {
            rule: path.to_string(),
            source,
        })?;
        tracing::trace!("exclude {}", path);
        self.excluded.push(Exclusion {
            rule: path.to_string(),
            pattern,
        });
        Ok(())
    }

    /// Remove the exclusion whose text is exactly `path`, if any.
    pub fn include(&mut self, path: &str) {
        tracing::trace!("include {}", path);
        self.excluded.retain(|e| e.rule != path);
    }

    /// Whether `full_path` falls under any excluded entry.
    pub fn is_excluded(&self, full_path: &str) -> bool {
        self.excluded.iter().any(|e| e.pattern.is_match(full_path))
    }

    /// Currently excluded entries, in the order they were added.
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(|e| e.rule.as_str())
    }
}

/// The ordered edits that configure a rule set for one target.
///
/// Shared steps come first; the platform-specific tail re-includes the
/// platform's own syscall subtree and, on Windows, drops the POSIX bindings.
pub fn target_ops(platform: Platform, runtime: Compiler, build_core: bool) -> Vec<RuleOp> {
    let mut ops = Vec::new();

    if !build_core {
        ops.push(RuleOp::exclude(CORE_DIR));
    }

    ops.extend(STANDARD_EXCLUSIONS.iter().map(|p| RuleOp::exclude(*p)));
    ops.push(RuleOp::include(runtime_dir(runtime)));

    if platform.is_windows() {
        ops.push(RuleOp::exclude(POSIX_STDC_DIR));
    }
    ops.push(RuleOp::include(format!("tango/sys/{}", platform.sys_dir())));

    ops
}
