//! Bob CLI - builds the Tango library for D

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;

use bob::builder::BuildError;
use bob::util::diagnostic::{emit, suggestions};
use bob::util::shell::{Shell, Verbosity};
use bob::util::Diagnostic;
use cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            // Bad flags and enum values are configuration errors: exit 1.
            _ => {
                let _ = e.print();
                eprintln!("{}", suggestions::USAGE);
                std::process::exit(1);
            }
        },
    };

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("bob=debug")
        } else {
            EnvFilter::new("bob=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let shell = Shell::new(verbosity, cli.color);

    if let Err(e) = build::execute(&cli, &shell) {
        let diagnostic = match e.downcast_ref::<BuildError>() {
            Some(err) if matches!(err, BuildError::ExternalProcess { .. }) && !shell.is_verbose() => {
                err.to_diagnostic().with_suggestion(suggestions::BUILD_FAILED)
            }
            Some(err) => err.to_diagnostic(),
            None => Diagnostic::error(format!("{:#}", e)),
        };
        emit(&diagnostic, shell.use_color());
        std::process::exit(1);
    }
}
