//! On-disk size of a target subtree.

use camino::Utf8Path;
use ignore::WalkBuilder;

use crate::error::ScanError;

/// Sums the apparent size of every non-directory entry under `path`.
///
/// Symbolic links are counted by their own metadata and never followed.
///
/// # Errors
///
/// Returns [`ScanError::Size`] on the first entry that cannot be read.
pub fn dir_size(path: &Utf8Path) -> Result<u64, ScanError> {
    let walker = WalkBuilder::new(path)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut total: u64 = 0;
    for entry in walker {
        let entry = entry.map_err(|e| ScanError::size(path, e))?;
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        let metadata = entry.metadata().map_err(|e| ScanError::size(path, e))?;
        total = total.saturating_add(metadata.len());
    }

    Ok(total)
}
