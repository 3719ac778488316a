//! Object file naming.
//!
//! Every object lands in one flat output directory, so its name has to carry
//! both where the source lives and which flags built it. Building the same
//! source with different flags then yields a different object, and a stale
//! object from an earlier flag set is never mistaken for a current one.

use std::path::Path;

use crate::util::fs::{relative_path, slash_path};

/// Characters folded to `-` in object names.
const FOLDED: &[char] = &['.', '/', '=', ' ', '"'];

/// Derive the object file name for `source`.
///
/// The name is the source's directory relative to `root`, immediately
/// followed by the file stem and the raw `flags` string, with every
/// character in `. / = space "` replaced by `-`, plus `extension`.
///
/// ```
/// use std::path::Path;
/// use bob::builder::fingerprint::object_name;
///
/// let name = object_name(
///     Path::new("/src"),
///     Path::new("/src/tango/core/Thread.d"),
///     "-release",
///     ".o",
/// );
/// assert_eq!(name, "tango-coreThread-release.o");
/// ```
pub fn object_name(root: &Path, source: &Path, flags: &str, extension: &str) -> String {
    let folder = source.parent().map(|dir| relative_path(root, dir)).unwrap_or_default();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = slash_path(&folder);
    name.push_str(&stem);
    name.push_str(flags);

    let mut folded: String = name
        .chars()
        .map(|c| if FOLDED.contains(&c) { '-' } else { c })
        .collect();
    folded.push_str(extension);
    folded
}
