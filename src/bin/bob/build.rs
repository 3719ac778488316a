//! Turning command-line flags and config files into a `BuildConfig`.

use std::time::Instant;

use anyhow::Result;

use bob::builder::BuildError;
use bob::core::config::DEFAULT_FLAGS;
use bob::util::config::{global_config_path, load_config, project_config_path};
use bob::util::shell::{format_duration, Shell, Status};
use bob::util::Config;
use bob::{BuildConfig, Platform, ProcessRunner};

use crate::cli::Cli;

pub fn execute(cli: &Cli, shell: &Shell) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file = load_config(global_config_path().as_deref(), &project_config_path(&cwd));
    let config = resolve_config(cli, &file, Platform::host())?;

    shell.status(
        Status::Building,
        format!(
            "{} for {} with {}",
            config.library_path().display(),
            config.platform,
            config.compiler
        ),
    );

    let start = Instant::now();
    let mut runner = ProcessRunner::new(config.verbose, config.inhibit);
    let progress = shell.spinner();
    let result = bob::ops::build(config, &mut runner, &progress);
    progress.finish_and_clear();
    let summary = result?;

    if summary.library.is_none() && cli.inhibit {
        shell.status(Status::Skipped, "archive (inhibited)");
    }
    shell.status(
        Status::Finished,
        format!("{} {} in {}", summary.platform, summary.compiler, format_duration(start.elapsed())),
    );
    println!("{} files", summary.files);

    Ok(())
}

/// Merge CLI flags over file config over defaults.
///
/// `host` is the detected host platform; without it an explicit package
/// filter is required.
pub fn resolve_config(
    cli: &Cli,
    file: &Config,
    host: Option<Platform>,
) -> Result<BuildConfig> {
    let root = cli
        .root
        .clone()
        .ok_or_else(|| BuildError::config("No output directory given"))?;

    let platform = match (cli.filter, host) {
        (Some(filter), _) => filter,
        (None, Some(host)) => host,
        (None, None) => return Err(BuildError::config("No package filter given").into()),
    };

    let mut config = BuildConfig::new(root, platform);
    config.verbose = cli.verbose;
    config.inhibit = cli.inhibit;
    config.include_user_modules = cli.include_user_modules;
    config.filter_explicitly_set = cli.filter.is_some();
    config.quick = cli.quick || file.build.quick.unwrap_or(false);

    config.compiler = match cli.compiler {
        Some(c) => c,
        None => file.compiler()?.unwrap_or(config.compiler),
    };
    config.runtime = match cli.runtime {
        Some(r) => r,
        None => file.runtime()?.unwrap_or(config.runtime),
    };

    // Asking for a runtime target always means building the core.
    config.build_core =
        cli.runtime.is_some() || !(cli.no_core || file.build.no_core.unwrap_or(false));

    config.flags = cli
        .options
        .clone()
        .or_else(|| file.build.options.clone())
        .unwrap_or_else(|| DEFAULT_FLAGS.to_string());

    if let Some(library) = cli.library.clone().or_else(|| file.build.library.clone()) {
        config.library_name = library;
    }
    if let Some(out) = cli.output_dir.clone().or_else(|| file.build.output_dir.clone()) {
        config.output_dir = out;
    }

    Ok(config)
}
