//! Data models for arsip
//!
//! Defines the archive record as it travels over the wire and the input
//! payload used for create and full-replacement updates.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned record identifier
///
/// Opaque to the client: it is only compared, displayed and put into URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveId(u64);

impl ArchiveId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArchiveId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An archive record as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Unique identifier, assigned by the backend
    pub id: ArchiveId,
    /// Display name
    pub nama: String,
    /// Free-text description (the backend may send null)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub deskripsi: String,
    /// Date associated with the record (ISO-8601 on the wire)
    pub tanggal: NaiveDate,
}

impl ArchiveRecord {
    /// The record's fields without its id
    pub fn to_input(&self) -> ArchiveInput {
        ArchiveInput {
            nama: self.nama.clone(),
            deskripsi: self.deskripsi.clone(),
            tanggal: self.tanggal,
        }
    }

    /// Case-insensitive substring match over `nama` and `deskripsi`
    ///
    /// An empty needle matches every record.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.nama.to_lowercase().contains(&needle)
            || self.deskripsi.to_lowercase().contains(&needle)
    }

    /// True if the stored fields equal the given input
    pub fn has_fields(&self, input: &ArchiveInput) -> bool {
        self.nama == input.nama && self.deskripsi == input.deskripsi && self.tanggal == input.tanggal
    }
}

/// Record payload without an id, sent on create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveInput {
    pub nama: String,
    pub deskripsi: String,
    pub tanggal: NaiveDate,
}

impl ArchiveInput {
    /// Create an input with an empty description
    pub fn new(nama: impl Into<String>, tanggal: NaiveDate) -> Self {
        Self {
            nama: nama.into(),
            deskripsi: String::new(),
            tanggal,
        }
    }

    /// Set the description
    pub fn with_deskripsi(mut self, deskripsi: impl Into<String>) -> Self {
        self.deskripsi = deskripsi.into();
        self
    }

    /// Attach a backend-assigned id, producing a full record
    pub fn into_record(self, id: ArchiveId) -> ArchiveRecord {
        ArchiveRecord {
            id,
            nama: self.nama,
            deskripsi: self.deskripsi,
            tanggal: self.tanggal,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_decodes_backend_json() {
        let json = r#"{"id": 7, "nama": "Surat A", "deskripsi": "desc", "tanggal": "2024-01-01"}"#;
        let record: ArchiveRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, ArchiveId::new(7));
        assert_eq!(record.nama, "Surat A");
        assert_eq!(record.deskripsi, "desc");
        assert_eq!(record.tanggal, date("2024-01-01"));
    }

    #[test]
    fn test_null_deskripsi_decodes_as_empty() {
        let json = r#"{"id": 1, "nama": "X", "deskripsi": null, "tanggal": "2024-05-01"}"#;
        let record: ArchiveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.deskripsi, "");

        let json = r#"{"id": 1, "nama": "X", "tanggal": "2024-05-01"}"#;
        let record: ArchiveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.deskripsi, "");
    }

    #[test]
    fn test_input_serializes_without_id() {
        let input = ArchiveInput::new("X", date("2024-05-01")).with_deskripsi("Y");
        let value = serde_json::to_value(&input).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(value["tanggal"], "2024-05-01");
        assert_eq!(value["deskripsi"], "Y");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let record = ArchiveInput::new("Surat Keputusan", date("2024-01-01"))
            .with_deskripsi("Arsip Rapat Tahunan")
            .into_record(ArchiveId::new(1));

        assert!(record.matches("surat"));
        assert!(record.matches("RAPAT"));
        assert!(record.matches(""));
        assert!(!record.matches("invoice"));
    }

    #[test]
    fn test_archive_id_parse() {
        assert_eq!("42".parse::<ArchiveId>().unwrap(), ArchiveId::new(42));
        assert_eq!(" 3 ".parse::<ArchiveId>().unwrap(), ArchiveId::new(3));
        assert!("abc".parse::<ArchiveId>().is_err());
        assert_eq!(ArchiveId::new(9).to_string(), "9");
    }

    #[test]
    fn test_to_input_round_trips_fields() {
        let input = ArchiveInput::new("Nama", date("2023-12-31")).with_deskripsi("D");
        let record = input.clone().into_record(ArchiveId::new(5));
        assert_eq!(record.to_input(), input);
        assert!(record.has_fields(&input));
    }
}
