//! Decoding `DESCRIBE FILE FORMAT` and `SHOW FILE FORMATS` results.
//!
//! `DESCRIBE` returns one row per property with the columns `property`,
//! `property_type`, `property_value` and `property_default`. `SHOW` returns a
//! summary row per matching file format, which is the only place the comment,
//! owner and creation time are reported.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::escape::unescape_string;
use super::file_format::{BinaryFormat, Compression, FileFormatType, Property, UnsupportedValue};
use crate::db::Row;

/// Errors decoding warehouse output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A property value could not be parsed as its declared kind.
    #[error("invalid value {value:?} for {property}: {reason}")]
    InvalidValue {
        /// The `DESCRIBE` property name.
        property: String,
        /// The raw value text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required column was missing from a result row.
    #[error("result row has no column {0}")]
    MissingColumn(String),

    /// No `SHOW` row matched the requested schema.
    #[error("no file format {name} found in {database}.{schema}")]
    NoMatchingRow {
        /// File format name.
        name: String,
        /// Database name.
        database: String,
        /// Schema name.
        schema: String,
    },
}

/// One row of `DESCRIBE FILE FORMAT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeRow {
    /// Property name, e.g. `SKIP_HEADER`.
    pub property: String,
    /// Declared kind, e.g. `Integer`.
    pub property_type: String,
    /// Current value.
    pub property_value: String,
    /// Warehouse default.
    pub property_default: String,
}

impl DescribeRow {
    /// Scan a result row by column name.
    pub fn from_row(row: &Row) -> Result<Self, DecodeError> {
        let column = |name: &str| -> Result<String, DecodeError> {
            match row.get(name) {
                Some(value) => Ok(value.unwrap_or_default().to_string()),
                None => Err(DecodeError::MissingColumn(name.to_string())),
            }
        };

        Ok(Self {
            property: column("property")?,
            property_type: column("property_type")?,
            property_value: column("property_value")?,
            property_default: column("property_default")?,
        })
    }
}

/// The properties of a file format as reported by `DESCRIBE`.
///
/// Unlike [`FileFormatOptions`](super::FileFormatOptions) every field is
/// populated: the warehouse reports defaults for anything the user never set,
/// and properties it does not report keep their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct FileFormatProperties {
    #[serde(rename = "type")]
    pub format_type: Option<FileFormatType>,
    pub compression: Option<Compression>,
    pub binary_as_text: bool,
    pub trim_space: bool,
    pub null_if: Vec<String>,
    pub record_delimiter: String,
    pub field_delimiter: String,
    pub file_extension: String,
    pub skip_header: i64,
    pub skip_blank_lines: bool,
    pub date_format: String,
    pub time_format: String,
    pub timestamp_format: String,
    pub binary_format: Option<BinaryFormat>,
    pub escape: String,
    pub escape_unenclosed_field: String,
    pub field_optionally_enclosed_by: String,
    pub error_on_column_count_mismatch: bool,
    pub replace_invalid_characters: bool,
    pub validate_utf8: bool,
    pub empty_field_as_null: bool,
    pub skip_byte_order_mark: bool,
    pub encoding: String,
}

/// Decode the rows of `DESCRIBE FILE FORMAT`.
///
/// Unknown properties are skipped. The first value that fails to parse aborts
/// the whole decode.
pub fn parse_describe(rows: &[Row]) -> Result<FileFormatProperties, DecodeError> {
    let mut props = FileFormatProperties::default();

    for row in rows {
        let row = DescribeRow::from_row(row)?;
        let Some(property) = Property::from_keyword(&row.property) else {
            continue;
        };
        let value = row.property_value.as_str();

        match property {
            Property::Type => props.format_type = Some(parse_enum(&row, value)?),
            Property::Comment => {},
            Property::Compression => props.compression = Some(parse_enum(&row, value)?),
            Property::BinaryAsText => props.binary_as_text = parse_bool(&row, value)?,
            Property::TrimSpace => props.trim_space = parse_bool(&row, value)?,
            Property::NullIf => props.null_if = parse_list(value),
            Property::RecordDelimiter => props.record_delimiter = value.to_string(),
            Property::FieldDelimiter => props.field_delimiter = value.to_string(),
            Property::FileExtension => props.file_extension = value.to_string(),
            Property::SkipHeader => props.skip_header = parse_int(&row, value)?,
            Property::SkipBlankLines => props.skip_blank_lines = parse_bool(&row, value)?,
            Property::DateFormat => props.date_format = value.to_string(),
            Property::TimeFormat => props.time_format = value.to_string(),
            Property::TimestampFormat => props.timestamp_format = value.to_string(),
            Property::BinaryFormat => props.binary_format = Some(parse_enum(&row, value)?),
            Property::Escape => props.escape = value.to_string(),
            Property::EscapeUnenclosedField => props.escape_unenclosed_field = value.to_string(),
            Property::FieldOptionallyEnclosedBy => {
                props.field_optionally_enclosed_by = value.to_string()
            },
            Property::ErrorOnColumnCountMismatch => {
                props.error_on_column_count_mismatch = parse_bool(&row, value)?
            },
            Property::ReplaceInvalidCharacters => {
                props.replace_invalid_characters = parse_bool(&row, value)?
            },
            Property::ValidateUtf8 => props.validate_utf8 = parse_bool(&row, value)?,
            Property::EmptyFieldAsNull => props.empty_field_as_null = parse_bool(&row, value)?,
            Property::SkipByteOrderMark => props.skip_byte_order_mark = parse_bool(&row, value)?,
            Property::Encoding => props.encoding = value.to_string(),
        }
    }

    Ok(props)
}

fn invalid(row: &DescribeRow, value: &str, reason: impl ToString) -> DecodeError {
    DecodeError::InvalidValue {
        property: row.property.clone(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(row: &DescribeRow, value: &str) -> Result<bool, DecodeError> {
    value.parse::<bool>().map_err(|e| invalid(row, value, e))
}

fn parse_int(row: &DescribeRow, value: &str) -> Result<i64, DecodeError> {
    value.parse::<i64>().map_err(|e| invalid(row, value, e))
}

fn parse_enum<T>(row: &DescribeRow, value: &str) -> Result<T, DecodeError>
where
    T: std::str::FromStr<Err = UnsupportedValue>,
{
    value.parse::<T>().map_err(|e| invalid(row, value, e))
}

/// Decode a list literal such as `["\\N","NULL",""]`.
///
/// `[]` and the empty string both decode to an empty list.
pub fn parse_list(value: &str) -> Vec<String> {
    let inner = value.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    if inner.trim().is_empty() {
        return Vec::new();
    }

    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            let item = item
                .strip_prefix('"')
                .and_then(|i| i.strip_suffix('"'))
                .unwrap_or(item);
            unescape_string(item)
        })
        .collect()
}

/// Identity and ownership metadata from `SHOW FILE FORMATS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFormatMetadata {
    /// File format name.
    pub name: String,
    /// Database the file format lives in.
    pub database_name: String,
    /// Schema the file format lives in.
    pub schema_name: String,
    /// Owning role.
    pub owner: String,
    /// Comment, empty if none.
    pub comment: String,
    /// Creation timestamp as reported.
    pub created_on: String,
}

impl FileFormatMetadata {
    /// Scan a `SHOW` row by column name.
    ///
    /// `name`, `database_name` and `schema_name` are required; the rest
    /// default to empty.
    pub fn from_row(row: &Row) -> Result<Self, DecodeError> {
        let required = |name: &str| {
            row.get_str(name)
                .map(str::to_string)
                .ok_or_else(|| DecodeError::MissingColumn(name.to_string()))
        };
        let optional = |name: &str| row.get_str(name).unwrap_or_default().to_string();

        Ok(Self {
            name: required("name")?,
            database_name: required("database_name")?,
            schema_name: required("schema_name")?,
            owner: optional("owner"),
            comment: optional("comment"),
            created_on: optional("created_on"),
        })
    }
}

/// Pick the `SHOW FILE FORMATS` row for `database.schema.name`.
///
/// `SHOW ... LIKE` matches across every schema of the database, so rows for
/// other schemas are skipped.
pub fn parse_show(
    rows: &[Row],
    name: &str,
    database: &str,
    schema: &str,
) -> Result<FileFormatMetadata, DecodeError> {
    for row in rows {
        let meta = FileFormatMetadata::from_row(row)?;
        if meta.name == name && meta.schema_name == schema {
            return Ok(meta);
        }
    }

    Err(DecodeError::NoMatchingRow {
        name: name.to_string(),
        database: database.to_string(),
        schema: schema.to_string(),
    })
}
