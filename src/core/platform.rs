//! Target platforms and D compilers.

use std::fmt;
use std::str::FromStr;

/// Operating systems the package filter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Darwin,
    FreeBsd,
    Linux,
    Haiku,
    Solaris,
    Windows,
}

impl Platform {
    /// All known platforms, in filter-list order.
    pub const ALL: [Platform; 6] = [
        Platform::Darwin,
        Platform::FreeBsd,
        Platform::Linux,
        Platform::Haiku,
        Platform::Solaris,
        Platform::Windows,
    ];

    /// Detect the platform of the running host.
    ///
    /// Returns `None` on an OS the package filter has no entry for; the
    /// caller must then ask for an explicit filter.
    pub fn host() -> Option<Platform> {
        match std::env::consts::OS {
            "macos" => Some(Platform::Darwin),
            "freebsd" => Some(Platform::FreeBsd),
            "linux" => Some(Platform::Linux),
            "haiku" => Some(Platform::Haiku),
            "solaris" | "illumos" => Some(Platform::Solaris),
            "windows" => Some(Platform::Windows),
            _ => None,
        }
    }

    /// Identifier used in source paths (`tango/sys/<name>`) and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::FreeBsd => "freebsd",
            Platform::Linux => "linux",
            Platform::Haiku => "haiku",
            Platform::Solaris => "solaris",
            Platform::Windows => "windows",
        }
    }

    /// Whether this is the Windows-like target (OMF objects, `lib` librarian).
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Object file extension, including the dot.
    pub fn object_extension(&self) -> &'static str {
        if self.is_windows() {
            ".obj"
        } else {
            ".o"
        }
    }

    /// Static library extension, including the dot.
    pub fn library_extension(&self) -> &'static str {
        if self.is_windows() {
            ".lib"
        } else {
            ".a"
        }
    }

    /// Default library base name (sans extension).
    pub fn default_library_name(&self) -> &'static str {
        if self.is_windows() {
            "tango"
        } else {
            "libtango"
        }
    }

    /// Name of the syscall subtree under `tango/sys`, if the platform has one.
    pub fn sys_dir(&self) -> &'static str {
        match self {
            Platform::Windows => "win32",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid package filter '{}'; expected one of: {}",
                    s,
                    Platform::ALL.map(|p| p.as_str()).join(", ")
                )
            })
    }
}

/// D compilers, which double as the runtime-support flavours under
/// `tango/core/rt/compiler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Compiler {
    #[default]
    Dmd,
    Gdc,
    Ldc,
}

impl Compiler {
    /// All compilers, in CLI-list order. The first one is the default.
    pub const ALL: [Compiler; 3] = [Compiler::Dmd, Compiler::Gdc, Compiler::Ldc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Dmd => "dmd",
            Compiler::Gdc => "gdc",
            Compiler::Ldc => "ldc",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compiler::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid compiler '{}'; expected one of: {}",
                    s,
                    Compiler::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_str() {
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn test_platform_parse_rejects_unknown() {
        let err = "plan9".parse::<Platform>().unwrap_err();
        assert!(err.contains("plan9"));
        assert!(err.contains("linux"));
    }

    #[test]
    fn test_windows_extensions() {
        assert_eq!(Platform::Windows.object_extension(), ".obj");
        assert_eq!(Platform::Windows.library_extension(), ".lib");
        assert_eq!(Platform::Windows.default_library_name(), "tango");
        assert_eq!(Platform::Windows.sys_dir(), "win32");
    }

    #[test]
    fn test_posix_extensions() {
        for p in [Platform::Linux, Platform::Darwin, Platform::FreeBsd, Platform::Solaris] {
            assert_eq!(p.object_extension(), ".o");
            assert_eq!(p.library_extension(), ".a");
            assert_eq!(p.default_library_name(), "libtango");
        }
    }

    #[test]
    fn test_compiler_default_is_first() {
        assert_eq!(Compiler::default(), Compiler::ALL[0]);
        assert_eq!("ldc".parse::<Compiler>().unwrap(), Compiler::Ldc);
        assert!("gcc".parse::<Compiler>().is_err());
    }
}
