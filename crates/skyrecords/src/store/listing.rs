//! Lazy enumeration of the records in a storage directory.

use std::fs::ReadDir;

use tracing::{trace, warn};

use crate::error::Result;
use crate::record::{RecordKey, RECORD_EXTENSION};

/// Iterator over the record keys found in a storage root.
///
/// Yields keys in whatever order the filesystem returns directory entries.
/// Directories, other extensions, and `.txt` files whose stem is not a
/// normalized key are skipped.
#[derive(Debug)]
pub struct RecordIter {
    entries: Option<ReadDir>,
}

impl RecordIter {
    pub(crate) fn new(entries: ReadDir) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    /// An iterator that yields nothing, for a root that doesn't exist yet.
    pub(crate) fn empty() -> Self {
        Self { entries: None }
    }
}

impl Iterator for RecordIter {
    type Item = Result<RecordKey>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;
        loop {
            let entry = match entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!("Skipping non UTF-8 file name in {}", path.display());
                continue;
            };

            match RecordKey::from_file_name(&name) {
                Some(key) => return Some(Ok(key)),
                None if path
                    .extension()
                    .is_some_and(|ext| ext == RECORD_EXTENSION) =>
                {
                    warn!("Skipping {name}: not a normalized record name");
                }
                None => trace!("Ignoring {name}"),
            }
        }
    }
}
