//! `skyrecords` - Per-client service records kept as plain text files
//!
//! This library provides the record store (name normalization, path
//! derivation, create/append/read/list operations), the record file format,
//! and the interactive menu used by the `skyrec` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod shell;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{normalize_name, ClientRecord, RecordKey, ServiceEntry};
pub use shell::Shell;
pub use store::{RecordIter, RecordStore, StoreStats};
