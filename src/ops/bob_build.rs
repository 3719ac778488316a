//! Implementation of a `bob` build run.

use std::sync::Arc;

use indicatif::ProgressBar;

use crate::builder::errors::{BuildError, BuildResult};
use crate::builder::library::BuildSummary;
use crate::builder::registry::BuildTargetRegistry;
use crate::core::config::BuildConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::CommandRunner;

/// Validate `config`, dispatch to the routine for its target, and run it.
///
/// Fails fast: the first unsupported target or failing command aborts the
/// run, leaving already-built objects in place.
pub fn build(
    config: BuildConfig,
    runner: &mut dyn CommandRunner,
    progress: &ProgressBar,
) -> BuildResult<BuildSummary> {
    config.validate()?;

    if config.include_user_modules {
        tracing::debug!("user modules are not part of the library build");
    }

    let out = &config.output_dir;
    if !out.as_os_str().is_empty() && !runner.is_inhibited() {
        ensure_dir(out).map_err(|e| BuildError::io(out, e))?;
    }

    let config = Arc::new(config);
    let registry = BuildTargetRegistry::standard(Arc::clone(&config))?;
    tracing::debug!("registered targets: {:?}", registry);

    let routine = registry.resolve(config.platform, config.compiler)?;
    routine.build(runner, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Compiler, Platform};
    use crate::test_support::{MockExecutor, TangoTree};
    use crate::util::process::ProcessRunner;

    fn scenario_tree() -> TangoTree {
        TangoTree::new()
            .with_source("tango/core/foo.d")
            .with_source("tango/sys/linux/bar.d")
    }

    fn linux_config(tree: &TangoTree) -> BuildConfig {
        let mut config = BuildConfig::new(tree.root(), Platform::Linux);
        config.output_dir = tree.out_dir();
        config
    }

    #[test]
    fn test_linux_dmd_with_core() {
        let tree = scenario_tree();
        let mut exec = MockExecutor::new();

        let summary = build(linux_config(&tree), &mut exec, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(exec.calls_to("dmd").len(), 2);
        let ar = exec.calls_to("ar");
        assert_eq!(ar.len(), 1);
        assert_eq!(summary.objects, 2);
        assert_eq!(ar[0].matches("-release.o").count(), 2);
    }

    #[test]
    fn test_linux_dmd_without_core() {
        let tree = scenario_tree();
        let mut config = linux_config(&tree);
        config.build_core = false;
        let mut exec = MockExecutor::new();

        let summary = build(config, &mut exec, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.files, 1);
        assert!(exec.calls_to("dmd")[0].ends_with("bar.d"));
    }

    #[test]
    fn test_win32_file_does_not_change_count() {
        let tree = scenario_tree().with_source("tango/sys/win32/x.d");
        let mut exec = MockExecutor::new();

        let summary = build(linux_config(&tree), &mut exec, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.files, 2);
    }

    #[test]
    fn test_unsupported_combination() {
        let tree = scenario_tree();
        let mut config = linux_config(&tree);
        config.platform = Platform::Haiku;
        config.compiler = Compiler::Ldc;
        let mut exec = MockExecutor::new();

        let err = build(config, &mut exec, &ProgressBar::hidden()).unwrap_err();

        assert_eq!(err.to_string(), "Unsupported combination of haiku and ldc");
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn test_invalid_root_is_configuration_error() {
        let tree = TangoTree::new();
        let config = BuildConfig::new(tree.out_dir(), Platform::Linux);

        let err = build(config, &mut MockExecutor::new(), &ProgressBar::hidden()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_output_dir_is_created() {
        let tree = scenario_tree();
        let mut config = linux_config(&tree);
        config.output_dir = tree.out_dir().join("nested").join("objs");
        let mut exec = MockExecutor::new();

        build(config, &mut exec, &ProgressBar::hidden()).unwrap();

        assert!(tree.out_dir().join("nested").join("objs").join("libtango.a").exists());
    }

    #[test]
    fn test_inhibit_runs_nothing_and_archives_nothing() {
        let tree = scenario_tree();
        let mut config = linux_config(&tree);
        config.inhibit = true;
        let mut runner = ProcessRunner::new(config.verbose, config.inhibit);

        let summary = build(config, &mut runner, &ProgressBar::hidden()).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.compiled, 2);
        assert_eq!(summary.objects, 0);
        assert!(summary.library.is_none());
    }
}
