//! Mapping from (platform, compiler) pairs to build routines.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::builder::errors::{BuildError, BuildResult};
use crate::builder::library::{BuildSummary, LibraryBuilder};
use crate::core::config::BuildConfig;
use crate::core::platform::{Compiler, Platform};
use crate::util::process::CommandRunner;

/// Platforms built with the POSIX toolchain layout.
pub const POSIX_PLATFORMS: [Platform; 4] = [
    Platform::Darwin,
    Platform::Linux,
    Platform::FreeBsd,
    Platform::Solaris,
];

/// A build routine for one (platform, compiler) pair.
pub trait BuildRoutine: Send + Sync {
    /// Compile and archive the library, returning the run summary.
    fn build(
        &self,
        runner: &mut dyn CommandRunner,
        progress: &ProgressBar,
    ) -> BuildResult<BuildSummary>;
}

/// A [`LibraryBuilder`] bound to one compiler.
struct CompilerRoutine {
    builder: Arc<LibraryBuilder>,
    compiler: Compiler,
}

impl BuildRoutine for CompilerRoutine {
    fn build(
        &self,
        runner: &mut dyn CommandRunner,
        progress: &ProgressBar,
    ) -> BuildResult<BuildSummary> {
        self.builder.build(self.compiler, runner, progress)
    }
}

/// Registry of build routines, keyed by (platform, compiler).
///
/// Populated once before any routine runs and only read afterwards.
#[derive(Default)]
pub struct BuildTargetRegistry {
    routines: HashMap<(Platform, Compiler), Arc<dyn BuildRoutine>>,
}

impl BuildTargetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        BuildTargetRegistry::default()
    }

    /// Register every supported target for `config`.
    ///
    /// Darwin, Linux, FreeBSD and Solaris support all three compilers;
    /// Windows only DMD.
    pub fn standard(config: Arc<BuildConfig>) -> BuildResult<Self> {
        let mut registry = BuildTargetRegistry::new();

        for platform in POSIX_PLATFORMS {
            let builder = Arc::new(LibraryBuilder::new(platform, Arc::clone(&config))?);
            for compiler in [Compiler::Dmd, Compiler::Ldc, Compiler::Gdc] {
                registry.register_builder(&builder, compiler);
            }
        }

        let windows = Arc::new(LibraryBuilder::new(Platform::Windows, config)?);
        registry.register_builder(&windows, Compiler::Dmd);

        Ok(registry)
    }

    /// Insert a routine. Registering the same pair again replaces it.
    pub fn register(
        &mut self,
        platform: Platform,
        compiler: Compiler,
        routine: Arc<dyn BuildRoutine>,
    ) {
        tracing::trace!("register {}/{}", platform, compiler);
        self.routines.insert((platform, compiler), routine);
    }

    fn register_builder(&mut self, builder: &Arc<LibraryBuilder>, compiler: Compiler) {
        let routine = CompilerRoutine {
            builder: Arc::clone(builder),
            compiler,
        };
        self.register(builder.platform(), compiler, Arc::new(routine));
    }

    /// Look up the routine for a pair.
    pub fn resolve(&self, platform: Platform, compiler: Compiler) -> BuildResult<Arc<dyn BuildRoutine>> {
        self.routines
            .get(&(platform, compiler))
            .cloned()
            .ok_or_else(|| BuildError::UnsupportedTarget { platform, compiler })
    }

    pub fn contains(&self, platform: Platform, compiler: Compiler) -> bool {
        self.routines.contains_key(&(platform, compiler))
    }

    /// Registered pairs, sorted.
    pub fn targets(&self) -> Vec<(Platform, Compiler)> {
        let mut targets: Vec<_> = self.routines.keys().copied().collect();
        targets.sort();
        targets
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl fmt::Debug for BuildTargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTargetRegistry")
            .field("targets", &self.targets())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockExecutor, TangoTree};

    struct Fixed(usize);

    impl BuildRoutine for Fixed {
        fn build(
            &self,
            _runner: &mut dyn CommandRunner,
            _progress: &ProgressBar,
        ) -> BuildResult<BuildSummary> {
            Ok(BuildSummary {
                platform: Platform::Haiku,
                compiler: Compiler::Gdc,
                files: self.0,
                compiled: 0,
                objects: 0,
                library: None,
            })
        }
    }

    fn standard() -> BuildTargetRegistry {
        let tree = TangoTree::new();
        BuildTargetRegistry::standard(Arc::new(BuildConfig::new(tree.root(), Platform::Linux)))
            .unwrap()
    }

    #[test]
    fn test_standard_targets() {
        let registry = standard();
        assert_eq!(registry.len(), 13);
        for platform in POSIX_PLATFORMS {
            for compiler in Compiler::ALL {
                assert!(registry.contains(platform, compiler));
            }
        }
        assert!(registry.contains(Platform::Windows, Compiler::Dmd));
        assert!(!registry.contains(Platform::Windows, Compiler::Ldc));
        assert!(!registry.contains(Platform::Haiku, Compiler::Dmd));
    }

    #[test]
    fn test_unregistered_pair_is_unsupported() {
        let registry = standard();
        let err = match registry.resolve(Platform::Windows, Compiler::Gdc) {
            Err(e) => e,
            Ok(_) => panic!("windows/gdc should not resolve"),
        };
        assert!(matches!(
            err,
            BuildError::UnsupportedTarget {
                platform: Platform::Windows,
                compiler: Compiler::Gdc
            }
        ));
        let msg = err.to_string();
        assert!(msg.contains("windows") && msg.contains("gdc"));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = BuildTargetRegistry::new();
        assert!(registry.is_empty());

        registry.register(Platform::Haiku, Compiler::Gdc, Arc::new(Fixed(1)));
        registry.register(Platform::Haiku, Compiler::Gdc, Arc::new(Fixed(7)));
        assert_eq!(registry.len(), 1);

        let routine = registry.resolve(Platform::Haiku, Compiler::Gdc).unwrap();
        let summary = routine
            .build(&mut MockExecutor::new(), &ProgressBar::hidden())
            .unwrap();
        assert_eq!(summary.files, 7);
    }

    #[test]
    fn test_targets_sorted() {
        let mut registry = BuildTargetRegistry::new();
        registry.register(Platform::Windows, Compiler::Dmd, Arc::new(Fixed(0)));
        registry.register(Platform::Darwin, Compiler::Ldc, Arc::new(Fixed(0)));
        assert_eq!(
            registry.targets(),
            vec![(Platform::Darwin, Compiler::Ldc), (Platform::Windows, Compiler::Dmd)]
        );
    }
}
