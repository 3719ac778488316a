//! Per-platform static library builder.
//!
//! A [`LibraryBuilder`] owns the rule set and compiler templates for one
//! target platform. Each build run walks `<root>/tango`, compiles every
//! surviving source that needs it, collects the objects that exist
//! afterwards into a [`Manifest`], and archives them in a single step.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::builder::errors::{BuildError, BuildResult};
use crate::builder::fingerprint::object_name;
use crate::builder::freshness::needs_compile;
use crate::builder::rules::RuleSet;
use crate::builder::toolchain::{
    self, archive_command, librarian_command, librarian_list, CommandTemplate,
};
use crate::core::config::BuildConfig;
use crate::core::platform::{Compiler, Platform};
use crate::util::fs::{remove_file_if_exists, slash_path};
use crate::util::process::CommandRunner;

/// Static runtime-init object linked into every Windows core build.
pub const WINDOWS_MINIT_OBJECT: &str = "tango/core/rt/compiler/dmd/minit.obj";

const D_SUFFIX: &str = ".d";
const C_SUFFIX: &str = ".c";
const ASM_SUFFIX: &str = ".S";

/// Ordered object list handed to the archiver.
#[derive(Debug, Clone)]
pub struct Manifest {
    platform: Platform,
    objects: Vec<PathBuf>,
}

impl Manifest {
    pub fn new(platform: Platform) -> Self {
        Manifest {
            platform,
            objects: Vec::new(),
        }
    }

    /// Append an object unconditionally.
    pub fn push(&mut self, object: impl Into<PathBuf>) {
        self.objects.push(object.into());
    }

    /// Append `object` if it exists on disk. Returns whether it was added.
    pub fn push_if_exists(&mut self, object: &Path) -> bool {
        if object.is_file() {
            self.objects.push(object.to_path_buf());
            true
        } else {
            false
        }
    }

    pub fn objects(&self) -> &[PathBuf] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn separator(&self) -> &'static str {
        if self.platform.is_windows() {
            "\r\n"
        } else {
            " "
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.separator();
        for (i, object) in self.objects.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", object.display())?;
        }
        Ok(())
    }
}

/// Outcome of one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub platform: Platform,
    pub compiler: Compiler,
    /// Source files that survived filtering. This is the reported count.
    pub files: usize,
    /// Files actually handed to a compiler.
    pub compiled: usize,
    /// Objects passed to the archiver.
    pub objects: usize,
    /// The archive written, if the manifest was non-empty.
    pub library: Option<PathBuf>,
}

/// Builds the library for one target platform.
#[derive(Debug)]
pub struct LibraryBuilder {
    platform: Platform,
    config: Arc<BuildConfig>,
    rules: RuleSet,
    dmd: CommandTemplate,
    gdc: CommandTemplate,
    ldc: CommandTemplate,
}

impl LibraryBuilder {
    /// Prepare the rule set and compiler templates for `platform`.
    pub fn new(platform: Platform, config: Arc<BuildConfig>) -> BuildResult<Self> {
        let rules = RuleSet::for_target(platform, config.runtime, config.build_core)?;
        let template =
            |compiler| toolchain::platform_d_compiler(platform, compiler, &config.root, &config.flags);

        Ok(LibraryBuilder {
            platform,
            rules,
            dmd: template(Compiler::Dmd),
            gdc: template(Compiler::Gdc),
            ldc: template(Compiler::Ldc),
            config,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// D compiler template for `compiler`.
    pub fn template(&self, compiler: Compiler) -> &CommandTemplate {
        match compiler {
            Compiler::Dmd => &self.dmd,
            Compiler::Gdc => &self.gdc,
            Compiler::Ldc => &self.ldc,
        }
    }

    /// Compile and archive the library with `compiler`.
    pub fn build(
        &self,
        compiler: Compiler,
        runner: &mut dyn CommandRunner,
        progress: &ProgressBar,
    ) -> BuildResult<BuildSummary> {
        let mut rules = self.rules.clone();
        rules.exclude(&self.foreign_runtime_dir(compiler))?;

        let library = self.config.library_path();
        if !runner.is_inhibited() {
            remove_file_if_exists(&library).map_err(|e| BuildError::io(&library, e))?;
        }

        let mut run = Run {
            builder: self,
            rules,
            runner,
            progress,
            manifest: Manifest::new(self.platform),
            files: 0,
            compiled: 0,
        };

        tracing::debug!("Building {} for {} with {}", library.display(), self.platform, compiler);

        run.scan(D_SUFFIX, self.template(compiler))?;

        if self.config.build_core {
            let c = toolchain::c_compiler(self.platform, compiler);
            run.scan(C_SUFFIX, &c)?;
            if !self.platform.is_windows() {
                run.scan(ASM_SUFFIX, &c)?;
            }
        }

        if self.platform.is_windows() && self.config.build_core {
            run.manifest.push(self.config.root.join(WINDOWS_MINIT_OBJECT));
        }

        let archived = if run.manifest.is_empty() {
            tracing::info!("No objects to archive");
            None
        } else {
            self.archive(&run.manifest, &library, run.runner)?;
            Some(library)
        };

        Ok(BuildSummary {
            platform: self.platform,
            compiler,
            files: run.files,
            compiled: run.compiled,
            objects: run.manifest.len(),
            library: archived,
        })
    }

    /// Runtime-support subtree of `compiler` that belongs to the other OS family.
    fn foreign_runtime_dir(&self, compiler: Compiler) -> String {
        let foreign = if self.platform.is_windows() {
            "posix"
        } else {
            "windows"
        };
        format!("{}/{}", crate::builder::rules::runtime_dir(compiler), foreign)
    }

    fn archive(
        &self,
        manifest: &Manifest,
        library: &Path,
        runner: &mut dyn CommandRunner,
    ) -> BuildResult<()> {
        tracing::info!("Archiving {} objects into {}", manifest.len(), library.display());
        tracing::debug!("{}", manifest);

        if !self.platform.is_windows() {
            return runner.run(&archive_command(library, manifest.objects()));
        }

        let list = self.config.output_dir.join(toolchain::LIBRARIAN_LIST_FILE);
        if !runner.is_inhibited() {
            fs::write(&list, librarian_list(library, manifest.objects()))
                .map_err(|e| BuildError::io(&list, e))?;
        }

        let result = runner.run(&librarian_command(&list));
        if runner.is_inhibited() {
            return result;
        }
        let cleanup = remove_file_if_exists(&list).map_err(|e| BuildError::io(&list, e));
        result?;
        cleanup
    }
}

/// State of a single build run.
struct Run<'a> {
    builder: &'a LibraryBuilder,
    rules: RuleSet,
    runner: &'a mut dyn CommandRunner,
    progress: &'a ProgressBar,
    manifest: Manifest,
    files: usize,
    compiled: usize,
}

impl Run<'_> {
    /// Compile every surviving file under `<root>/tango` ending in `suffix`.
    fn scan(&mut self, suffix: &str, template: &CommandTemplate) -> BuildResult<()> {
        let base = self.builder.config.library_root();

        for entry in WalkDir::new(&base) {
            let entry = entry.map_err(|err| {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone());
                BuildError::io(path, err.into())
            })?;

            // Symlinked files count, symlinked directories are not walked.
            if !entry.path().is_file() || !entry.file_name().to_string_lossy().ends_with(suffix) {
                continue;
            }

            let source = entry.path();
            if self.rules.is_excluded(&slash_path(source)) {
                tracing::trace!("excluded {}", source.display());
                continue;
            }

            self.files += 1;
            self.compile(source, template)?;
        }

        Ok(())
    }

    fn compile(&mut self, source: &Path, template: &CommandTemplate) -> BuildResult<()> {
        let builder = self.builder;
        let config = &builder.config;
        let name = object_name(
            &config.root,
            source,
            &config.flags,
            builder.platform.object_extension(),
        );
        let object = config.output_dir.join(name);

        if needs_compile(config.quick, source, &object)? {
            self.progress.set_message(slash_path(source));
            self.runner.run(&template.invocation(&object, source))?;
            self.compiled += 1;
        } else {
            tracing::debug!("Fresh {}", object.display());
        }
        self.progress.inc(1);

        self.manifest.push_if_exists(&object);
        Ok(())
    }
}
