//! Core record types for skyrecords.
//!
//! This module defines the normalized record key, the service entries that
//! make up a client's history, and the line-oriented text format a record is
//! stored in:
//!
//! ```text
//! SKY - EXPEDIENTE DE CLIENTE
//! Cliente: <display name>
//! Archivo: <filename>
//! Contacto: <contact or N/A>
//! Fecha de creacion: <YYYY-MM-DD HH:MM:SS>
//! ----------------------------------------
//! HISTORIAL DE SERVICIOS:
//! - [<timestamp>] <service> | <description>
//! ```

use std::fmt;
use std::path::Path;

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// File extension of record files.
pub const RECORD_EXTENSION: &str = "txt";

/// Timestamp layout used in record files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TITLE: &str = "SKY - EXPEDIENTE DE CLIENTE";
const SEPARATOR: &str = "----------------------------------------";
const HISTORY_HEADING: &str = "HISTORIAL DE SERVICIOS:";
const CLIENT_PREFIX: &str = "Cliente: ";
const FILE_PREFIX: &str = "Archivo: ";
const CONTACT_PREFIX: &str = "Contacto: ";
const CREATED_PREFIX: &str = "Fecha de creacion: ";
const NO_CONTACT: &str = "N/A";

/// Normalize a display name into a filesystem-safe key.
///
/// Whitespace runs collapse to a single underscore and every character that
/// is neither alphanumeric nor `_` is dropped. The result may be empty.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            key.push('_');
        }
        key.extend(word.chars().filter(|c| c.is_alphanumeric() || *c == '_'));
    }
    key
}

/// Current local time, truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Fold line breaks into single spaces so a field always fits on one line.
fn single_line(s: &str) -> String {
    if !s.contains(['\r', '\n']) {
        return s.to_string();
    }
    s.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The normalized, filesystem-safe identity of a client record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    /// Derive the key for a display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if the name normalizes to nothing.
    pub fn from_display_name(name: &str) -> Result<Self> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(Error::invalid_name(name));
        }
        Ok(Self(key))
    }

    /// Recover the key from a record file name such as `Juan_Perez.txt`.
    ///
    /// Returns `None` for other extensions and for stems that are not
    /// already in normalized form.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name
            .strip_suffix(RECORD_EXTENSION)?
            .strip_suffix('.')?;
        if stem.is_empty() || normalize_name(stem) != stem {
            return None;
        }
        Some(Self(stem.to_string()))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the record for this key.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{RECORD_EXTENSION}", self.0)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One timestamped line of a client's service history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// When the service was requested.
    pub timestamp: NaiveDateTime,
    /// The requested service (telephony, internet, pay TV, ...).
    pub service: String,
    /// Free-text description of the request.
    pub description: String,
}

impl ServiceEntry {
    /// Create an entry stamped with the current local time.
    #[must_use]
    pub fn new(service: &str, description: &str) -> Self {
        Self::at(now(), service, description)
    }

    /// Create an entry with an explicit timestamp.
    ///
    /// A `|` in the service becomes `/`, since the first ` | ` on a history
    /// line separates service from description.
    #[must_use]
    pub fn at(timestamp: NaiveDateTime, service: &str, description: &str) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
            service: single_line(service).replace('|', "/"),
            description: single_line(description),
        }
    }

    /// Render the entry as a history line, without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "- [{}] {} | {}",
            format_timestamp(self.timestamp),
            self.service,
            self.description
        )
    }

    /// Parse a history line produced by [`ServiceEntry::to_line`].
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix("- [")?;
        let (ts, rest) = rest.split_once("] ")?;
        let timestamp = parse_timestamp(ts)?;
        let (service, description) = rest.split_once(" | ")?;
        Some(Self {
            timestamp,
            service: service.to_string(),
            description: description.to_string(),
        })
    }
}

/// Render the header block of a new record, ending with the history heading.
#[must_use]
pub fn render_header(
    display_name: &str,
    key: &RecordKey,
    contact: Option<&str>,
    created_at: NaiveDateTime,
) -> String {
    let contact = contact
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| NO_CONTACT.to_string(), single_line);

    let mut out = String::new();
    for line in [
        TITLE.to_string(),
        format!("{CLIENT_PREFIX}{}", single_line(display_name.trim())),
        format!("{FILE_PREFIX}{}", key.file_name()),
        format!("{CONTACT_PREFIX}{contact}"),
        format!("{CREATED_PREFIX}{}", format_timestamp(created_at)),
        SEPARATOR.to_string(),
        HISTORY_HEADING.to_string(),
    ] {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// A client record parsed back from its text file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// The name as the operator entered it.
    pub display_name: String,
    /// Name of the file the record lives in.
    pub file_name: String,
    /// Contact information, if any was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// When the record was created.
    pub created_at: NaiveDateTime,
    /// Service history, oldest first.
    pub entries: Vec<ServiceEntry>,
}

impl ClientRecord {
    /// Parse the text of a record file.
    ///
    /// History lines that don't look like service entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if the header block is incomplete.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let mut lines = text.lines();

        if lines.next().map(str::trim_end) != Some(TITLE) {
            return Err(Error::malformed(path, "missing record title"));
        }

        let display_name = header_field(path, lines.next(), CLIENT_PREFIX)?.to_string();
        let file_name = header_field(path, lines.next(), FILE_PREFIX)?.to_string();
        let contact = header_field(path, lines.next(), CONTACT_PREFIX)?;
        let contact = (contact != NO_CONTACT).then(|| contact.to_string());

        let created = header_field(path, lines.next(), CREATED_PREFIX)?;
        let created_at = parse_timestamp(created).ok_or_else(|| {
            Error::malformed(path, format!("invalid creation timestamp: {created}"))
        })?;

        if lines.next().map(str::trim_end) != Some(SEPARATOR) {
            return Err(Error::malformed(path, "missing separator line"));
        }
        if lines.next().map(str::trim_end) != Some(HISTORY_HEADING) {
            return Err(Error::malformed(path, "missing history heading"));
        }

        let mut entries = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match ServiceEntry::parse_line(line) {
                Some(entry) => entries.push(entry),
                None => warn!("Skipping unrecognized history line in {}", path.display()),
            }
        }

        Ok(Self {
            display_name,
            file_name,
            contact,
            created_at,
            entries,
        })
    }
}

fn header_field<'a>(path: &Path, line: Option<&'a str>, prefix: &str) -> Result<&'a str> {
    line.and_then(|l| l.strip_prefix(prefix))
        .map(str::trim_end)
        .ok_or_else(|| Error::malformed(path, format!("missing '{}' line", prefix.trim_end())))
}
