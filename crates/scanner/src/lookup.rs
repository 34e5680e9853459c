//! Existing-file lookup over candidate lists.
//!
//! Sidecars written by other tools differ in case (`Movie.NFO`,
//! `TVSHOW.nfo`), so names are matched against the directory listing
//! case-insensitively rather than probed directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::{DirEntry, MetadataFs};
use crate::paths;
use crate::resolver::Candidate;

/// Path of the first candidate that exists as a file, using the on-disk
/// spelling of the file name.
pub async fn find_existing<F>(fs: &F, candidates: &[Candidate]) -> Option<PathBuf>
where
    F: MetadataFs + ?Sized,
{
    let mut listings: HashMap<&str, Vec<DirEntry>> = HashMap::new();

    for candidate in candidates {
        let dir = candidate.directory.as_str();
        if !listings.contains_key(dir) {
            let entries = match fs.list_entries(Path::new(dir)).await {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir, error = %e, "cannot list candidate directory");
                    Vec::new()
                }
            };
            listings.insert(dir, entries);
        }

        let wanted = candidate.file_name.to_lowercase();
        let found = listings
            .get(dir)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|e| !e.is_dir && e.name.to_lowercase() == wanted)
            });
        if let Some(entry) = found {
            return Some(PathBuf::from(paths::join(dir, &entry.name)));
        }
    }

    None
}
