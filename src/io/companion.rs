/// Locating the data file that belongs to a descriptor

use crate::error::{MdsError, Result};
use crate::image::Filename;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Open the data file for a track
///
/// The name embedded in the descriptor is tried first, relative to the
/// descriptor's directory. If it is missing, wide, or cannot be opened, a
/// warning is logged and the descriptor's own name with its extension's last
/// letter changed from `s` to `f` is used instead.
pub fn open_data_file(descriptor: &Path, embedded: Option<&Filename>) -> Result<(PathBuf, File)> {
    match embedded {
        Some(Filename::Narrow(name)) => {
            let candidate = embedded_data_path(descriptor, name);
            match File::open(&candidate) {
                Ok(file) => {
                    debug!(path = %candidate.display(), "opened embedded data file");
                    return Ok((candidate, file));
                }
                Err(e) => warn!("couldn't open '{}': {}", candidate.display(), e),
            }
        }
        Some(Filename::Wide(name)) => {
            warn!("wide-character data file name '{}' is not supported", name);
        }
        None => debug!("descriptor names no data file"),
    }

    let fallback = fallback_data_path(descriptor)?;
    let file = File::open(&fallback).map_err(|e| MdsError::open(&fallback, e))?;
    debug!(path = %fallback.display(), "opened fallback data file");
    Ok((fallback, file))
}

/// Resolve an embedded name against the descriptor's directory
///
/// A leading `*` stands for the descriptor's file stem, so `*.mdf` next to
/// `disc.mds` names `disc.mdf`.
pub fn embedded_data_path(descriptor: &Path, name: &str) -> PathBuf {
    let resolved = match (name.strip_prefix('*'), descriptor.file_stem()) {
        (Some(rest), Some(stem)) => {
            let mut expanded = stem.to_os_string();
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        _ => PathBuf::from(name),
    };
    match descriptor.parent() {
        Some(dir) => dir.join(resolved),
        None => resolved,
    }
}

/// Derive `name.mdf` from `name.mds`, preserving case
///
/// Only a three-letter extension ending in `s` or `S` is accepted.
pub fn fallback_data_path(descriptor: &Path) -> Result<PathBuf> {
    let bad_name = || MdsError::BadDescriptorName {
        path: descriptor.to_path_buf(),
    };

    let ext = descriptor
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(bad_name)?;
    if ext.len() != 3 || !ext.is_ascii() {
        return Err(bad_name());
    }

    let (stem, last) = ext.split_at(2);
    let replaced = match last {
        "s" => "f",
        "S" => "F",
        _ => return Err(bad_name()),
    };
    Ok(descriptor.with_extension(format!("{}{}", stem, replaced)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_fallback_lowercase() {
        let path = fallback_data_path(Path::new("/tmp/game.mds")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/game.mdf"));
    }

    #[test]
    fn test_fallback_uppercase() {
        let path = fallback_data_path(Path::new("GAME.MDS")).unwrap();
        assert_eq!(path, PathBuf::from("GAME.MDF"));
    }

    #[test]
    fn test_fallback_rejects_other_shapes() {
        for name in ["game", "game.md", "game.mdss", "game.mdx", "game.s"] {
            let err = fallback_data_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, MdsError::BadDescriptorName { .. }), "{}", name);
        }
    }

    #[test]
    #[traced_test]
    fn test_embedded_name_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mds = dir.path().join("disc.mds");
        std::fs::write(dir.path().join("disc.mdf"), b"data").unwrap();

        let embedded = Filename::Narrow("missing.mdf".to_string());
        let (path, _file) = open_data_file(&mds, Some(&embedded)).unwrap();
        assert_eq!(path, dir.path().join("disc.mdf"));
        assert!(logs_contain("couldn't open"));
    }

    #[test]
    #[traced_test]
    fn test_wide_name_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mds = dir.path().join("disc.mds");
        std::fs::write(dir.path().join("disc.mdf"), b"data").unwrap();
        std::fs::write(dir.path().join("wide.mdf"), b"data").unwrap();

        let embedded = Filename::Wide("wide.mdf".to_string());
        let (path, _file) = open_data_file(&mds, Some(&embedded)).unwrap();
        assert_eq!(path, dir.path().join("disc.mdf"));
        assert!(logs_contain("wide-character"));
    }

    #[test]
    #[traced_test]
    fn test_star_name_uses_descriptor_stem() {
        let dir = tempfile::tempdir().unwrap();
        let mds = dir.path().join("disc.mds");
        std::fs::write(dir.path().join("disc.mdf"), b"data").unwrap();

        let embedded = Filename::Narrow("*.mdf".to_string());
        let (path, _file) = open_data_file(&mds, Some(&embedded)).unwrap();
        assert_eq!(path, dir.path().join("disc.mdf"));
        assert!(!logs_contain("couldn't open"));
    }

    #[test]
    fn test_embedded_data_path() {
        let mds = Path::new("/images/Game Disc.mds");
        assert_eq!(
            embedded_data_path(mds, "*.mdf"),
            PathBuf::from("/images/Game Disc.mdf")
        );
        assert_eq!(
            embedded_data_path(mds, "track.bin"),
            PathBuf::from("/images/track.bin")
        );
        assert_eq!(
            embedded_data_path(Path::new("disc.mds"), "*.MDF"),
            PathBuf::from("disc.MDF")
        );
    }

    #[test]
    fn test_embedded_name_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let mds = dir.path().join("disc.mds");
        std::fs::write(dir.path().join("other.bin"), b"data").unwrap();
        std::fs::write(dir.path().join("disc.mdf"), b"data").unwrap();

        let embedded = Filename::Narrow("other.bin".to_string());
        let (path, _file) = open_data_file(&mds, Some(&embedded)).unwrap();
        assert_eq!(path, dir.path().join("other.bin"));
    }

    #[test]
    fn test_fallback_missing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mds = dir.path().join("disc.mds");
        let err = open_data_file(&mds, None).unwrap_err();
        assert!(matches!(err, MdsError::OpenFile { .. }));
    }
}
