//! Composite resource identifiers.
//!
//! A file format is identified by `database|schema|name`, written as a single
//! CSV record with `|` as the delimiter. Components are only quoted when they
//! contain `|`, a double quote or a line break.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ID_DELIMITER: u8 = b'|';
const ID_FIELDS: usize = 3;

/// Errors decoding a resource identifier.
#[derive(Debug, Error)]
pub enum IdError {
    /// The identifier is not a well-formed CSV record.
    #[error("identifier {id:?} is not CSV compatible: {source}")]
    NotCsv {
        /// The identifier text.
        id: String,
        /// Reader error.
        #[source]
        source: csv::Error,
    },

    /// The identifier holds zero or several records.
    #[error("identifier {id:?} must hold exactly one record, got {records}")]
    RecordCount {
        /// The identifier text.
        id: String,
        /// Records found.
        records: usize,
    },

    /// The identifier has the wrong number of fields.
    #[error("identifier {id:?} must have 3 fields (database|schema|name), got {fields}")]
    FieldCount {
        /// The identifier text.
        id: String,
        /// Fields found.
        fields: usize,
    },

    /// Writing the identifier failed.
    #[error("failed to encode identifier: {0}")]
    Encode(String),
}

/// The identity of a file format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileFormatId {
    /// Database name.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// File format name.
    pub name: String,
}

impl FileFormatId {
    /// Create an identifier.
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Encode as `database|schema|name`.
    pub fn encode(&self) -> Result<String, IdError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(ID_DELIMITER)
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record([&self.database, &self.schema, &self.name])
            .map_err(|e| IdError::Encode(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| IdError::Encode(e.to_string()))?;
        let encoded = String::from_utf8(bytes).map_err(|e| IdError::Encode(e.to_string()))?;

        Ok(encoded.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }

    /// Decode `database|schema|name`.
    pub fn decode(id: &str) -> Result<Self, IdError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(ID_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(id.as_bytes());

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record.map_err(|source| IdError::NotCsv {
                id: id.to_string(),
                source,
            })?);
        }

        if records.len() != 1 {
            return Err(IdError::RecordCount {
                id: id.to_string(),
                records: records.len(),
            });
        }

        let record = &records[0];
        if record.len() != ID_FIELDS {
            return Err(IdError::FieldCount {
                id: id.to_string(),
                fields: record.len(),
            });
        }

        Ok(Self::new(&record[0], &record[1], &record[2]))
    }
}

impl fmt::Display for FileFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => write!(f, "{}|{}|{}", self.database, self.schema, self.name),
        }
    }
}

impl FromStr for FileFormatId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain() {
        let id = FileFormatId::new("test_db", "test_schema", "test_file_format");
        assert_eq!(id.encode().unwrap(), "test_db|test_schema|test_file_format");
        assert_eq!(id.to_string(), "test_db|test_schema|test_file_format");
    }

    #[test]
    fn test_decode_plain() {
        let id = FileFormatId::decode("test_db|test_schema|test_file_format").unwrap();
        assert_eq!(id, FileFormatId::new("test_db", "test_schema", "test_file_format"));
    }

    #[test]
    fn test_round_trip_with_special_characters() {
        let ids = [
            FileFormatId::new("db", "sch|ema", "name"),
            FileFormatId::new("db", "schema", "with \"quotes\""),
            FileFormatId::new("db.x", "schema", "a,b"),
            FileFormatId::new("DB", "PUBLIC", "FORMAT_1"),
        ];
        for id in ids {
            let encoded = id.encode().unwrap();
            assert_eq!(FileFormatId::decode(&encoded).unwrap(), id, "encoded {:?}", encoded);
        }
    }

    #[test]
    fn test_delimiter_component_is_quoted() {
        let id = FileFormatId::new("db", "sch|ema", "name");
        assert_eq!(id.encode().unwrap(), r#"db|"sch|ema"|name"#);
    }

    #[test]
    fn test_decode_wrong_field_count() {
        let err = FileFormatId::decode("test_db|test_file_format").unwrap_err();
        assert!(matches!(err, IdError::FieldCount { fields: 2, .. }));

        let err = FileFormatId::decode("a|b|c|d").unwrap_err();
        assert!(matches!(err, IdError::FieldCount { fields: 4, .. }));
    }

    #[test]
    fn test_decode_multiple_records() {
        let err = FileFormatId::decode("a|b|c\nd|e|f").unwrap_err();
        assert!(matches!(err, IdError::RecordCount { records: 2, .. }));
    }

    #[test]
    fn test_decode_empty() {
        let err = FileFormatId::decode("").unwrap_err();
        assert!(matches!(err, IdError::RecordCount { records: 0, .. }));
    }

    #[test]
    fn test_from_str() {
        let id: FileFormatId = "a|b|c".parse().unwrap();
        assert_eq!(id.name, "c");
    }
}
