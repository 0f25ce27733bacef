//! Archive entry naming.
//!
//! Host paths are flattened into forward-slash archive names on the way in,
//! and archive names are resolved under an extraction root on the way out.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;

/// Returns the final component of `path` as UTF-8, if it has one.
///
/// `.`, `..` and filesystem roots have no final component.
///
/// # Errors
///
/// Returns `InvalidArgument` if the component is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarkit_core::path::base_name;
///
/// assert_eq!(base_name(Path::new("/tmp/dir")).unwrap(), Some("dir"));
/// assert_eq!(base_name(Path::new(".")).unwrap(), None);
/// ```
pub fn base_name(path: &Path) -> Result<Option<&str>> {
    path.file_name()
        .map(|name| {
            name.to_str().ok_or_else(|| {
                ArchiveError::InvalidArgument(format!(
                    "file name is not valid UTF-8: {}",
                    path.display()
                ))
            })
        })
        .transpose()
}

/// Builds the archive name for `relative` under an optional `base`.
///
/// Separators are always `/`, whatever the host convention. An empty
/// `relative` yields `base` itself.
///
/// # Errors
///
/// Returns `InvalidArgument` if `relative` is absolute, climbs with `..`, is
/// not valid UTF-8, or the result would be empty.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarkit_core::path::archive_name;
///
/// let name = archive_name(Some("dir"), Path::new("sub").join("a").as_path()).unwrap();
/// assert_eq!(name, "dir/sub/a");
/// assert_eq!(archive_name(Some("dir"), Path::new("")).unwrap(), "dir");
/// ```
pub fn archive_name(base: Option<&str>, relative: &Path) -> Result<String> {
    let mut name = base.map(str::to_string).unwrap_or_default();

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    ArchiveError::InvalidArgument(format!(
                        "path is not valid UTF-8: {}",
                        relative.display()
                    ))
                })?;
                if !name.is_empty() {
                    name.push('/');
                }
                name.push_str(part);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::InvalidArgument(format!(
                    "path is not relative to the walk root: {}",
                    relative.display()
                )));
            }
        }
    }

    if name.is_empty() {
        return Err(ArchiveError::InvalidArgument(
            "archive entry name is empty".to_string(),
        ));
    }
    Ok(name)
}

/// Resolves an archive name under the extraction root.
///
/// Empty and `.` segments are dropped, so a leading `/` lands under `root`.
/// Returns the joined path and whether it is the root itself.
///
/// # Errors
///
/// Returns `PathTraversal` if any segment is `..`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tarkit_core::path::resolve_destination;
///
/// let (path, is_root) = resolve_destination(Path::new("out"), "dir/a").unwrap();
/// assert_eq!(path, Path::new("out").join("dir").join("a"));
/// assert!(!is_root);
///
/// assert!(resolve_destination(Path::new("out"), "../etc/passwd").is_err());
/// ```
pub fn resolve_destination(root: &Path, name: &str) -> Result<(PathBuf, bool)> {
    let mut path = root.to_path_buf();
    let mut is_root = true;

    for segment in name.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(ArchiveError::PathTraversal {
                    name: name.to_string(),
                });
            }
            part => {
                path.push(part);
                is_root = false;
            }
        }
    }

    Ok((path, is_root))
}

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_plain() {
        assert_eq!(base_name(Path::new("file")).unwrap(), Some("file"));
        assert_eq!(base_name(Path::new("a/b/file.txt")).unwrap(), Some("file.txt"));
    }

    #[test]
    fn test_base_name_without_final_component() {
        assert_eq!(base_name(Path::new("..")).unwrap(), None);
        assert_eq!(base_name(Path::new("/")).unwrap(), None);
    }

    #[test]
    fn test_archive_name_root() {
        assert_eq!(archive_name(Some("dir"), Path::new("")).unwrap(), "dir");
        assert_eq!(archive_name(Some("dir"), Path::new(".")).unwrap(), "dir");
    }

    #[test]
    fn test_archive_name_nested_uses_forward_slashes() {
        let relative: PathBuf = ["sub", "deeper", "file"].iter().collect();
        assert_eq!(
            archive_name(Some("dir"), &relative).unwrap(),
            "dir/sub/deeper/file"
        );
    }

    #[test]
    fn test_archive_name_without_base() {
        let relative: PathBuf = ["sub", "file"].iter().collect();
        assert_eq!(archive_name(None, &relative).unwrap(), "sub/file");
    }

    #[test]
    fn test_archive_name_rejects_empty() {
        assert!(matches!(
            archive_name(None, Path::new("")),
            Err(ArchiveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_archive_name_rejects_parent() {
        assert!(archive_name(Some("dir"), Path::new("../x")).is_err());
    }

    #[test]
    fn test_resolve_destination_relative_root() {
        let (path, is_root) = resolve_destination(Path::new(""), "file").unwrap();
        assert_eq!(path, PathBuf::from("file"));
        assert!(!is_root);
    }

    #[test]
    fn test_resolve_destination_strips_leading_slash() {
        let (path, _) = resolve_destination(Path::new("out"), "/abs/file").unwrap();
        assert_eq!(path, Path::new("out").join("abs").join("file"));
    }

    #[test]
    fn test_resolve_destination_root_itself() {
        let (path, is_root) = resolve_destination(Path::new("out"), "./").unwrap();
        assert_eq!(path, PathBuf::from("out"));
        assert!(is_root);
    }

    #[test]
    fn test_resolve_destination_rejects_traversal() {
        let err = resolve_destination(Path::new("out"), "a/../../b").unwrap_err();
        assert!(matches!(err, ArchiveError::PathTraversal { .. }));
    }
}
