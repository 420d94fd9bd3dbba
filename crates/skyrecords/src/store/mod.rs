//! Storage layer for skyrecords.
//!
//! This module keeps one plain-text file per client under a storage root.
//! Records are created once, grow only by appending service entries, and are
//! never rewritten or deleted.
//!
//! There is no file locking: two processes appending to the same record at
//! the same time may interleave their writes.

pub mod listing;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{render_header, ClientRecord, RecordKey, ServiceEntry};

pub use listing::RecordIter;

/// Handle over a directory of client records.
///
/// The store owns no open files; every operation opens, writes, and closes
/// the record it touches.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory holding the record files.
    root: PathBuf,
}

impl RecordStore {
    /// Create a handle over `root` without touching the filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a handle over `root` and make sure the directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory tree cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        store.ensure_storage()?;
        Ok(store)
    }

    /// Get the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory tree if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_storage(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::DirectoryCreate {
            path: self.root.clone(),
            source,
        })?;
        debug!("Storage ready at {}", self.root.display());
        Ok(())
    }

    /// Path of the record file for a display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if the name normalizes to nothing.
    pub fn record_path(&self, display_name: &str) -> Result<PathBuf> {
        let key = RecordKey::from_display_name(display_name)?;
        Ok(self.path_for(&key))
    }

    /// Path of the record file for a key.
    #[must_use]
    pub fn path_for(&self, key: &RecordKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Create a new record with its first service entry, stamped now.
    ///
    /// An empty or blank `contact` is stored as `N/A`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if a record with the same key exists,
    /// [`Error::InvalidName`] for an unusable name, or an I/O error.
    pub fn create_record(
        &self,
        display_name: &str,
        contact: Option<&str>,
        service: &str,
        description: &str,
    ) -> Result<RecordKey> {
        let entry = ServiceEntry::new(service, description);
        self.create_with_entry(display_name, contact, &entry)
    }

    /// Create a new record whose first entry is `entry`.
    ///
    /// The creation timestamp is taken from the entry. The existence check
    /// and the file creation are a single `create_new` open, so an existing
    /// record is never touched.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::create_record`].
    pub fn create_with_entry(
        &self,
        display_name: &str,
        contact: Option<&str>,
        entry: &ServiceEntry,
    ) -> Result<RecordKey> {
        let key = RecordKey::from_display_name(display_name)?;
        let path = self.path_for(&key);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists {
                    key: key.to_string(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut contents = render_header(display_name, &key, contact, entry.timestamp);
        contents.push_str(&entry.to_line());
        contents.push('\n');
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        info!(key = %key, "Created client record at {}", path.display());
        Ok(key)
    }

    /// Append a service entry, stamped now, to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no record for the name, in
    /// which case no file is created.
    pub fn append_entry(
        &self,
        display_name: &str,
        service: &str,
        description: &str,
    ) -> Result<ServiceEntry> {
        let entry = ServiceEntry::new(service, description);
        self.append_with_entry(display_name, &entry)?;
        Ok(entry)
    }

    /// Append `entry` as one line at the end of an existing record.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::append_entry`].
    pub fn append_with_entry(&self, display_name: &str, entry: &ServiceEntry) -> Result<()> {
        let key = RecordKey::from_display_name(display_name)?;
        let path = self.path_for(&key);

        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| missing_record(e, &key))?;

        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;

        info!(key = %key, service = %entry.service, "Appended service entry");
        Ok(())
    }

    /// Read the full text of a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no record for the name.
    pub fn read_record(&self, display_name: &str) -> Result<String> {
        let key = RecordKey::from_display_name(display_name)?;
        let path = self.path_for(&key);
        debug!("Reading record {}", path.display());
        fs::read_to_string(&path).map_err(|e| missing_record(e, &key))
    }

    /// Read and parse a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no record for the name, or
    /// [`Error::MalformedRecord`] if its header cannot be parsed.
    pub fn load_record(&self, display_name: &str) -> Result<ClientRecord> {
        let text = self.read_record(display_name)?;
        let path = self.record_path(display_name)?;
        ClientRecord::parse(&path, &text)
    }

    /// Enumerate the records in storage.
    ///
    /// The order is whatever the filesystem returns. A storage root that
    /// doesn't exist yet holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be read.
    pub fn list_records(&self) -> Result<RecordIter> {
        match fs::read_dir(&self.root) {
            Ok(entries) => Ok(RecordIter::new(entries)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RecordIter::empty()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a record exists for the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for an unusable name, or an I/O error
    /// other than the file being absent.
    pub fn exists(&self, display_name: &str) -> Result<bool> {
        let path = self.record_path(display_name)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Get storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory or a record cannot be read.
    pub fn stats(&self) -> Result<StoreStats> {
        let mut total_records = 0;
        let mut total_bytes = 0;
        for key in self.list_records()? {
            let key = key?;
            total_records += 1;
            total_bytes += fs::metadata(self.path_for(&key))?.len();
        }

        Ok(StoreStats {
            root: self.root.clone(),
            total_records,
            total_bytes,
        })
    }
}

fn missing_record(err: io::Error, key: &RecordKey) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::not_found(key.as_str())
    } else {
        err.into()
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Storage root directory.
    pub root: PathBuf,
    /// Number of record files.
    pub total_records: usize,
    /// Combined size of the record files in bytes.
    pub total_bytes: u64,
}
