//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use bob::util::shell::ColorChoice;
use bob::{Compiler, Platform};

/// Bob - builds the Tango library for D
#[derive(Parser, Debug)]
#[command(name = "bob")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "bob [OPTIONS] <tango-path>")]
pub struct Cli {
    /// Directory containing the `tango` source tree
    #[arg(value_name = "tango-path")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quick execution: only recompile sources newer than their objects
    #[arg(short, long)]
    pub quick: bool,

    /// Inhibit execution: print what would run, run nothing
    #[arg(short, long)]
    pub inhibit: bool,

    /// Include user modules
    #[arg(short = 'u', long = "include")]
    pub include_user_modules: bool,

    /// Include a runtime target (dmd, gdc, ldc)
    #[arg(short, long, env = "BOB_RUNTIME")]
    pub runtime: Option<Compiler>,

    /// Specify a compiler to use (dmd, gdc, ldc)
    #[arg(short, long, env = "BOB_COMPILER")]
    pub compiler: Option<Compiler>,

    /// Specify D compiler options [default: -release]
    #[arg(short, long, env = "BOB_OPTIONS", allow_hyphen_values = true)]
    pub options: Option<String>,

    /// Specify library name (sans .ext)
    #[arg(short, long, env = "BOB_LIBRARY")]
    pub library: Option<String>,

    /// Determines package filtering (darwin, freebsd, linux, haiku, solaris, windows)
    #[arg(short = 'p', long, env = "BOB_FILTER")]
    pub filter: Option<Platform>,

    /// Leave the core runtime out of the library
    #[arg(long)]
    pub no_core: bool,

    /// Directory for objects and the library [default: current directory]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Coloring: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
