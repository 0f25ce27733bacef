//! Directory tree planning for `add_tree`.
//!
//! A walk is flattened into a [`WalkPlan`] before anything is written, so
//! walk errors surface before the first header of the tree.

use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;

use tracing::warn;
use walkdir::WalkDir;

use crate::ArchiveError;
use crate::EntryKind;
use crate::Result;
use crate::path::archive_name;
use crate::path::base_name;

/// One planned archive entry.
#[derive(Debug)]
pub(crate) struct PlannedEntry {
    /// Filesystem path to read from.
    pub path: PathBuf,

    /// Archive name, `/`-separated.
    pub name: String,

    pub kind: EntryKind,

    /// Metadata of the entry, or of its target when symlinks are followed.
    pub metadata: Metadata,
}

/// Ordered entries for one tree.
///
/// Pre-order: a directory comes before everything under it, and siblings
/// are sorted by file name.
pub(crate) type WalkPlan = Vec<PlannedEntry>;

/// Walks `root` and plans its entries.
///
/// Entries are named `basename(root)/<relative path>`. A root with no base
/// name (`.`, `..`, `/`) contributes no entry of its own and its descendants
/// are named by their relative path alone.
pub(crate) fn plan_tree(root: &Path, follow_symlinks: bool) -> Result<WalkPlan> {
    let base = base_name(root)?;
    let mut plan = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(walk_error)?;

        if entry.depth() == 0 && base.is_none() {
            continue;
        }

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            warn!(
                path = %entry.path().display(),
                "skipping entry that is neither a regular file nor a directory"
            );
            continue;
        };

        let relative = entry.path().strip_prefix(root).map_err(|_| {
            ArchiveError::InvalidArgument(format!(
                "walked path escapes its root: {}",
                entry.path().display()
            ))
        })?;
        let name = archive_name(base, relative)?;
        let metadata = entry.metadata().map_err(walk_error)?;

        plan.push(PlannedEntry {
            path: entry.into_path(),
            name,
            kind,
            metadata,
        });
    }

    Ok(plan)
}

fn walk_error(err: walkdir::Error) -> ArchiveError {
    let path = err.path().map(Path::to_path_buf);
    match err.into_io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::NotFound => ArchiveError::SourceNotFound {
            path: path.unwrap_or_default(),
        },
        Some(io) => ArchiveError::Io(io),
        None => ArchiveError::Io(std::io::Error::other(format!(
            "filesystem loop detected at {}",
            path.unwrap_or_default().display()
        ))),
    }
}
