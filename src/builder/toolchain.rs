//! Compiler and archiver command construction.
//!
//! Each compiler invocation is a [`CommandTemplate`]: a program, its leading
//! arguments, and an output flag that the object path is glued onto
//! (`-of<obj>` for D compilers, `-o<obj>` for C compilers). Compiling a file
//! appends `<output flag><object>` and the source path, in that order.

use std::path::Path;

use crate::core::platform::{Compiler, Platform};
use crate::util::process::ProcessBuilder;

/// Header lines of the librarian response file on Windows.
pub const LIBRARIAN_OPTIONS: &str = "-c -n -p256";

/// Name of the librarian response file on Windows.
pub const LIBRARIAN_LIST_FILE: &str = "tango.lsp";

/// A compiler invocation waiting for its object and source paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    program: String,
    args: Vec<String>,
    output_flag: String,
}

impl CommandTemplate {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        output_flag: impl Into<String>,
    ) -> Self {
        CommandTemplate {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            output_flag: output_flag.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Insert `arg` directly after the program name, ahead of every other
    /// argument.
    pub fn with_leading_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.insert(0, arg.into());
        self
    }

    /// Command line compiling `source` into `object`.
    pub fn invocation(&self, object: &Path, source: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.args)
            .arg(format!("{}{}", self.output_flag, object.display()))
            .arg(source)
    }
}

/// Split the free-form option string into argument tokens.
pub fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}

/// D compiler template for `compiler`, without any platform defines.
pub fn d_compiler(compiler: Compiler, root: &Path, flags: &str) -> CommandTemplate {
    let root = root.display();
    let mut args = vec!["-c".to_string(), format!("-I{}/tango/core", root)];
    if compiler == Compiler::Ldc {
        args.push(format!("-I{}/tango/core/rt/compiler/ldc", root));
    }
    args.push(format!("-I{}", root));
    args.extend(split_flags(flags));

    CommandTemplate::new(compiler.as_str(), args, "-of")
}

/// D compiler template for `compiler` on `platform`.
///
/// DMD needs to be told which BSD-ish flavour it is targeting; the
/// `-version=` define goes right after the program name.
pub fn platform_d_compiler(
    platform: Platform,
    compiler: Compiler,
    root: &Path,
    flags: &str,
) -> CommandTemplate {
    let template = d_compiler(compiler, root, flags);
    match (platform, compiler) {
        (Platform::Darwin, Compiler::Dmd) => template.with_leading_arg("-version=darwin"),
        (Platform::FreeBsd, Compiler::Dmd) => template.with_leading_arg("-version=freebsd"),
        _ => template,
    }
}

/// Template for C and assembly sources of the runtime.
///
/// DMD produces 32-bit code on POSIX, so its C helpers are built with
/// `-m32`; Windows uses the Digital Mars C compiler.
pub fn c_compiler(platform: Platform, compiler: Compiler) -> CommandTemplate {
    if platform.is_windows() {
        return CommandTemplate::new("dmc", ["-c", "-mn", "-6", "-r"], "-o");
    }
    match compiler {
        Compiler::Dmd => CommandTemplate::new("gcc", ["-c", "-m32"], "-o"),
        Compiler::Gdc | Compiler::Ldc => CommandTemplate::new("gcc", ["-c"], "-o"),
    }
}

/// `ar -r <library> <objects>...`
pub fn archive_command(library: &Path, objects: &[impl AsRef<Path>]) -> ProcessBuilder {
    ProcessBuilder::new("ar")
        .arg("-r")
        .arg(library)
        .args(objects.iter().map(|o| o.as_ref().as_os_str()))
}

/// Contents of the librarian response file: options, library, then objects.
pub fn librarian_list(library: &Path, objects: &[impl AsRef<Path>]) -> String {
    let mut contents = String::new();
    contents.push_str(LIBRARIAN_OPTIONS);
    contents.push_str("\r\n");
    contents.push_str(&library.display().to_string());
    contents.push_str("\r\n");
    for object in objects {
        contents.push_str(&object.as_ref().display().to_string());
        contents.push_str("\r\n");
    }
    contents
}

/// `lib @<list file>`
pub fn librarian_command(list_file: &Path) -> ProcessBuilder {
    ProcessBuilder::new("lib").arg(format!("@{}", list_file.display()))
}
