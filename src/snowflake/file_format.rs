//! SQL generation for Snowflake file formats.
//!
//! [`FileFormatBuilder`] carries the qualified name of one file format and the
//! options the user set on it, and renders the DDL for:
//!
//! - `CREATE FILE FORMAT`
//! - `ALTER FILE FORMAT ... SET`
//! - `DROP FILE FORMAT`
//! - `DESCRIBE FILE FORMAT`
//! - `SHOW FILE FORMATS`
//!
//! # Example
//!
//! ```
//! use hemmer_provider_snowflake::snowflake::{FileFormatBuilder, FileFormatType};
//!
//! let sql = FileFormatBuilder::new("my_format", "my_db", "public")
//!     .with_type(FileFormatType::Csv)
//!     .with_skip_header(1)
//!     .create();
//!
//! assert_eq!(
//!     sql,
//!     r#"CREATE FILE FORMAT "my_db"."public"."my_format" TYPE = "csv" SKIP_HEADER = 1"#
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::escape::escape_string;

/// A value that is not one of an enum's accepted spellings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value} is not a supported {kind}")]
pub struct UnsupportedValue {
    /// What was being parsed (e.g. "compression algorithm").
    pub kind: &'static str,
    /// The rejected text.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every accepted value, in the case it is rendered.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// The text used when rendering SQL and state.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnsupportedValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnsupportedValue {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnsupportedValue;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

string_enum! {
    /// The format of the data files a file format describes.
    FileFormatType, "type" {
        /// Delimited text.
        Csv => "csv",
        /// Apache Parquet.
        Parquet => "parquet",
    }
}

string_enum! {
    /// Compression algorithm of the data files.
    Compression, "compression algorithm" {
        /// Detect automatically.
        Auto => "auto",
        /// Brotli.
        Brotli => "brotli",
        /// Bzip2.
        Bz2 => "bz2",
        /// Deflate with zlib header.
        Deflate => "deflate",
        /// Gzip.
        Gzip => "gzip",
        /// LZO.
        Lzo => "lzo",
        /// Raw deflate without header.
        RawDeflate => "raw_deflate",
        /// Snappy.
        Snappy => "snappy",
        /// Zstandard.
        Zstd => "zstd",
        /// Uncompressed.
        None => "none",
    }
}

string_enum! {
    /// Encoding of binary input or output.
    BinaryFormat, "binary format" {
        /// Hexadecimal.
        Hex => "HEX",
        /// Base64.
        Base64 => "BASE64",
        /// UTF-8 text.
        Utf8 => "UTF8",
    }
}

/// A configurable file format property.
///
/// [`Property::ALL`] lists them in declaration order, which is also the order
/// of clauses in `CREATE FILE FORMAT` and the order in which updates are
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Property {
    Type,
    Comment,
    Compression,
    BinaryAsText,
    TrimSpace,
    NullIf,
    RecordDelimiter,
    FieldDelimiter,
    FileExtension,
    SkipHeader,
    SkipBlankLines,
    DateFormat,
    TimeFormat,
    TimestampFormat,
    BinaryFormat,
    Escape,
    EscapeUnenclosedField,
    FieldOptionallyEnclosedBy,
    ErrorOnColumnCountMismatch,
    ReplaceInvalidCharacters,
    ValidateUtf8,
    EmptyFieldAsNull,
    SkipByteOrderMark,
    Encoding,
}

impl Property {
    /// All properties in declaration order.
    pub const ALL: [Property; 24] = [
        Property::Type,
        Property::Comment,
        Property::Compression,
        Property::BinaryAsText,
        Property::TrimSpace,
        Property::NullIf,
        Property::RecordDelimiter,
        Property::FieldDelimiter,
        Property::FileExtension,
        Property::SkipHeader,
        Property::SkipBlankLines,
        Property::DateFormat,
        Property::TimeFormat,
        Property::TimestampFormat,
        Property::BinaryFormat,
        Property::Escape,
        Property::EscapeUnenclosedField,
        Property::FieldOptionallyEnclosedBy,
        Property::ErrorOnColumnCountMismatch,
        Property::ReplaceInvalidCharacters,
        Property::ValidateUtf8,
        Property::EmptyFieldAsNull,
        Property::SkipByteOrderMark,
        Property::Encoding,
    ];

    /// The SQL keyword, as used in DDL and reported by `DESCRIBE`.
    pub fn keyword(self) -> &'static str {
        match self {
            Property::Type => "TYPE",
            Property::Comment => "COMMENT",
            Property::Compression => "COMPRESSION",
            Property::BinaryAsText => "BINARY_AS_TEXT",
            Property::TrimSpace => "TRIM_SPACE",
            Property::NullIf => "NULL_IF",
            Property::RecordDelimiter => "RECORD_DELIMITER",
            Property::FieldDelimiter => "FIELD_DELIMITER",
            Property::FileExtension => "FILE_EXTENSION",
            Property::SkipHeader => "SKIP_HEADER",
            Property::SkipBlankLines => "SKIP_BLANK_LINES",
            Property::DateFormat => "DATE_FORMAT",
            Property::TimeFormat => "TIME_FORMAT",
            Property::TimestampFormat => "TIMESTAMP_FORMAT",
            Property::BinaryFormat => "BINARY_FORMAT",
            Property::Escape => "ESCAPE",
            Property::EscapeUnenclosedField => "ESCAPE_UNENCLOSED_FIELD",
            Property::FieldOptionallyEnclosedBy => "FIELD_OPTIONALLY_ENCLOSED_BY",
            Property::ErrorOnColumnCountMismatch => "ERROR_ON_COLUMN_COUNT_MISMATCH",
            Property::ReplaceInvalidCharacters => "REPLACE_INVALID_CHARACTERS",
            Property::ValidateUtf8 => "VALIDATE_UTF8",
            Property::EmptyFieldAsNull => "EMPTY_FIELD_AS_NULL",
            Property::SkipByteOrderMark => "SKIP_BYTE_ORDER_MARK",
            Property::Encoding => "ENCODING",
        }
    }

    /// The resource attribute name (the lowercase keyword).
    pub fn attribute(self) -> &'static str {
        match self {
            Property::Type => "type",
            Property::Comment => "comment",
            Property::Compression => "compression",
            Property::BinaryAsText => "binary_as_text",
            Property::TrimSpace => "trim_space",
            Property::NullIf => "null_if",
            Property::RecordDelimiter => "record_delimiter",
            Property::FieldDelimiter => "field_delimiter",
            Property::FileExtension => "file_extension",
            Property::SkipHeader => "skip_header",
            Property::SkipBlankLines => "skip_blank_lines",
            Property::DateFormat => "date_format",
            Property::TimeFormat => "time_format",
            Property::TimestampFormat => "timestamp_format",
            Property::BinaryFormat => "binary_format",
            Property::Escape => "escape",
            Property::EscapeUnenclosedField => "escape_unenclosed_field",
            Property::FieldOptionallyEnclosedBy => "field_optionally_enclosed_by",
            Property::ErrorOnColumnCountMismatch => "error_on_column_count_mismatch",
            Property::ReplaceInvalidCharacters => "replace_invalid_characters",
            Property::ValidateUtf8 => "validate_utf8",
            Property::EmptyFieldAsNull => "empty_field_as_null",
            Property::SkipByteOrderMark => "skip_byte_order_mark",
            Property::Encoding => "encoding",
        }
    }

    /// Look a property up by its `DESCRIBE` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Property> {
        Property::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// The value assigned to a [`Property`].
///
/// The variant decides how the value is rendered into SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Rendered `"csv"`.
    Type(FileFormatType),
    /// Rendered `"gzip"`.
    Compression(Compression),
    /// Rendered bare, e.g. `HEX`.
    BinaryFormat(BinaryFormat),
    /// Rendered `true` / `false`.
    Bool(bool),
    /// Rendered as a decimal literal.
    Int(i64),
    /// Rendered double-quoted and escaped.
    String(String),
    /// Rendered `('a','b')`, each element escaped.
    List(Vec<String>),
}

impl PropertyValue {
    fn render(&self) -> String {
        match self {
            PropertyValue::Type(t) => format!("\"{}\"", t),
            PropertyValue::Compression(c) => format!("\"{}\"", c),
            PropertyValue::BinaryFormat(b) => b.to_string(),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Int(i) => i.to_string(),
            PropertyValue::String(s) => format!("\"{}\"", escape_string(s)),
            PropertyValue::List(items) => {
                let quoted: Vec<String> = items
                    .iter()
                    .map(|item| format!("'{}'", escape_string(item)))
                    .collect();
                format!("({})", quoted.join(","))
            },
        }
    }
}

/// The optional properties of a file format.
///
/// `None` means "not set": no clause is rendered and the warehouse default
/// applies. `Some` always renders, even for empty strings, `false` and `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct FileFormatOptions {
    #[serde(rename = "type")]
    pub format_type: Option<FileFormatType>,
    pub comment: Option<String>,
    pub compression: Option<Compression>,
    pub binary_as_text: Option<bool>,
    pub trim_space: Option<bool>,
    #[serde(deserialize_with = "deserialize_null_if")]
    pub null_if: Option<Vec<String>>,
    pub record_delimiter: Option<String>,
    pub field_delimiter: Option<String>,
    pub file_extension: Option<String>,
    pub skip_header: Option<i64>,
    pub skip_blank_lines: Option<bool>,
    pub date_format: Option<String>,
    pub time_format: Option<String>,
    pub timestamp_format: Option<String>,
    pub binary_format: Option<BinaryFormat>,
    pub escape: Option<String>,
    pub escape_unenclosed_field: Option<String>,
    pub field_optionally_enclosed_by: Option<String>,
    pub error_on_column_count_mismatch: Option<bool>,
    pub replace_invalid_characters: Option<bool>,
    pub validate_utf8: Option<bool>,
    pub empty_field_as_null: Option<bool>,
    pub skip_byte_order_mark: Option<bool>,
    pub encoding: Option<String>,
}

// A null list element is the empty string.
fn deserialize_null_if<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|items| items.into_iter().map(Option::unwrap_or_default).collect()))
}

impl FileFormatOptions {
    /// The value of `property`, if set.
    pub fn get(&self, property: Property) -> Option<PropertyValue> {
        use PropertyValue as V;

        let string = |s: &Option<String>| s.clone().map(V::String);

        match property {
            Property::Type => self.format_type.map(V::Type),
            Property::Comment => string(&self.comment),
            Property::Compression => self.compression.map(V::Compression),
            Property::BinaryAsText => self.binary_as_text.map(V::Bool),
            Property::TrimSpace => self.trim_space.map(V::Bool),
            Property::NullIf => self.null_if.clone().map(V::List),
            Property::RecordDelimiter => string(&self.record_delimiter),
            Property::FieldDelimiter => string(&self.field_delimiter),
            Property::FileExtension => string(&self.file_extension),
            Property::SkipHeader => self.skip_header.map(V::Int),
            Property::SkipBlankLines => self.skip_blank_lines.map(V::Bool),
            Property::DateFormat => string(&self.date_format),
            Property::TimeFormat => string(&self.time_format),
            Property::TimestampFormat => string(&self.timestamp_format),
            Property::BinaryFormat => self.binary_format.map(V::BinaryFormat),
            Property::Escape => string(&self.escape),
            Property::EscapeUnenclosedField => string(&self.escape_unenclosed_field),
            Property::FieldOptionallyEnclosedBy => string(&self.field_optionally_enclosed_by),
            Property::ErrorOnColumnCountMismatch => {
                self.error_on_column_count_mismatch.map(V::Bool)
            },
            Property::ReplaceInvalidCharacters => self.replace_invalid_characters.map(V::Bool),
            Property::ValidateUtf8 => self.validate_utf8.map(V::Bool),
            Property::EmptyFieldAsNull => self.empty_field_as_null.map(V::Bool),
            Property::SkipByteOrderMark => self.skip_byte_order_mark.map(V::Bool),
            Property::Encoding => string(&self.encoding),
        }
    }

    /// The set properties, in declaration order.
    pub fn set_properties(&self) -> Vec<(Property, PropertyValue)> {
        Property::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
            .collect()
    }
}

/// Builds DDL for a single file format.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFormatBuilder {
    name: String,
    database: String,
    schema: String,
    options: FileFormatOptions,
}

impl FileFormatBuilder {
    /// Start a builder for `"database"."schema"."name"` with no options set.
    pub fn new(
        name: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            database: database.into(),
            schema: schema.into(),
            options: FileFormatOptions::default(),
        }
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: FileFormatOptions) -> Self {
        self.options = options;
        self
    }

    /// The options currently set on the builder.
    pub fn options(&self) -> &FileFormatOptions {
        &self.options
    }

    /// `"database"."schema"."name"`.
    pub fn qualified_name(&self) -> String {
        format!("\"{}\".\"{}\".\"{}\"", self.database, self.schema, self.name)
    }

    /// Set the format type.
    pub fn with_type(mut self, format_type: FileFormatType) -> Self {
        self.options.format_type = Some(format_type);
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.options.comment = Some(comment.into());
        self
    }

    /// Set the compression algorithm.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.options.compression = Some(compression);
        self
    }

    /// Set whether untyped Parquet columns are read as text.
    pub fn with_binary_as_text(mut self, binary_as_text: bool) -> Self {
        self.options.binary_as_text = Some(binary_as_text);
        self
    }

    /// Set whether surrounding whitespace is trimmed.
    pub fn with_trim_space(mut self, trim_space: bool) -> Self {
        self.options.trim_space = Some(trim_space);
        self
    }

    /// Set the strings converted to and from SQL NULL.
    pub fn with_null_if<I, S>(mut self, null_if: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.null_if = Some(null_if.into_iter().map(Into::into).collect());
        self
    }

    /// Set the record delimiter.
    pub fn with_record_delimiter(mut self, record_delimiter: impl Into<String>) -> Self {
        self.options.record_delimiter = Some(record_delimiter.into());
        self
    }

    /// Set the field delimiter.
    pub fn with_field_delimiter(mut self, field_delimiter: impl Into<String>) -> Self {
        self.options.field_delimiter = Some(field_delimiter.into());
        self
    }

    /// Set the extension of unloaded files.
    pub fn with_file_extension(mut self, file_extension: impl Into<String>) -> Self {
        self.options.file_extension = Some(file_extension.into());
        self
    }

    /// Set the number of header lines to skip.
    pub fn with_skip_header(mut self, skip_header: i64) -> Self {
        self.options.skip_header = Some(skip_header);
        self
    }

    /// Set whether blank lines are skipped.
    pub fn with_skip_blank_lines(mut self, skip_blank_lines: bool) -> Self {
        self.options.skip_blank_lines = Some(skip_blank_lines);
        self
    }

    /// Set the date format.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.options.date_format = Some(date_format.into());
        self
    }

    /// Set the time format.
    pub fn with_time_format(mut self, time_format: impl Into<String>) -> Self {
        self.options.time_format = Some(time_format.into());
        self
    }

    /// Set the timestamp format.
    pub fn with_timestamp_format(mut self, timestamp_format: impl Into<String>) -> Self {
        self.options.timestamp_format = Some(timestamp_format.into());
        self
    }

    /// Set the binary encoding.
    pub fn with_binary_format(mut self, binary_format: BinaryFormat) -> Self {
        self.options.binary_format = Some(binary_format);
        self
    }

    /// Set the escape character.
    pub fn with_escape(mut self, escape: impl Into<String>) -> Self {
        self.options.escape = Some(escape.into());
        self
    }

    /// Set the escape character for unenclosed fields.
    pub fn with_escape_unenclosed_field(mut self, escape: impl Into<String>) -> Self {
        self.options.escape_unenclosed_field = Some(escape.into());
        self
    }

    /// Set the character used to enclose strings.
    pub fn with_field_optionally_enclosed_by(mut self, enclosed_by: impl Into<String>) -> Self {
        self.options.field_optionally_enclosed_by = Some(enclosed_by.into());
        self
    }

    /// Set whether a column count mismatch is a parse error.
    pub fn with_error_on_column_count_mismatch(mut self, error: bool) -> Self {
        self.options.error_on_column_count_mismatch = Some(error);
        self
    }

    /// Set whether invalid UTF-8 is replaced with U+FFFD.
    pub fn with_replace_invalid_characters(mut self, replace: bool) -> Self {
        self.options.replace_invalid_characters = Some(replace);
        self
    }

    /// Set whether string columns are validated as UTF-8.
    pub fn with_validate_utf8(mut self, validate: bool) -> Self {
        self.options.validate_utf8 = Some(validate);
        self
    }

    /// Set whether empty fields load as NULL.
    pub fn with_empty_field_as_null(mut self, empty_field_as_null: bool) -> Self {
        self.options.empty_field_as_null = Some(empty_field_as_null);
        self
    }

    /// Set whether a leading BOM is skipped.
    pub fn with_skip_byte_order_mark(mut self, skip: bool) -> Self {
        self.options.skip_byte_order_mark = Some(skip);
        self
    }

    /// Set the character set of the source data.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.options.encoding = Some(encoding.into());
        self
    }

    /// `CREATE FILE FORMAT` with one clause per set option.
    pub fn create(&self) -> String {
        let mut sql = format!("CREATE FILE FORMAT {}", self.qualified_name());
        for (property, value) in self.options.set_properties() {
            sql.push(' ');
            sql.push_str(property.keyword());
            sql.push_str(" = ");
            sql.push_str(&value.render());
        }
        sql
    }

    /// `ALTER FILE FORMAT ... SET <property> = <value>`.
    pub fn change(&self, property: Property, value: &PropertyValue) -> String {
        format!(
            "ALTER FILE FORMAT {} SET {} = {}",
            self.qualified_name(),
            property.keyword(),
            value.render()
        )
    }

    /// Alter the comment.
    pub fn change_comment(&self, comment: &str) -> String {
        self.change(Property::Comment, &PropertyValue::String(comment.to_string()))
    }

    /// Alter the compression algorithm.
    pub fn change_compression(&self, compression: Compression) -> String {
        self.change(Property::Compression, &PropertyValue::Compression(compression))
    }

    /// Alter BINARY_AS_TEXT.
    pub fn change_binary_as_text(&self, binary_as_text: bool) -> String {
        self.change(Property::BinaryAsText, &PropertyValue::Bool(binary_as_text))
    }

    /// Alter TRIM_SPACE.
    pub fn change_trim_space(&self, trim_space: bool) -> String {
        self.change(Property::TrimSpace, &PropertyValue::Bool(trim_space))
    }

    /// Alter NULL_IF.
    pub fn change_null_if<S: AsRef<str>>(&self, null_if: &[S]) -> String {
        let items = null_if.iter().map(|s| s.as_ref().to_string()).collect();
        self.change(Property::NullIf, &PropertyValue::List(items))
    }

    /// Alter RECORD_DELIMITER.
    pub fn change_record_delimiter(&self, record_delimiter: &str) -> String {
        self.change(
            Property::RecordDelimiter,
            &PropertyValue::String(record_delimiter.to_string()),
        )
    }

    /// Alter FIELD_DELIMITER.
    pub fn change_field_delimiter(&self, field_delimiter: &str) -> String {
        self.change(
            Property::FieldDelimiter,
            &PropertyValue::String(field_delimiter.to_string()),
        )
    }

    /// Alter FILE_EXTENSION.
    pub fn change_file_extension(&self, file_extension: &str) -> String {
        self.change(
            Property::FileExtension,
            &PropertyValue::String(file_extension.to_string()),
        )
    }

    /// Alter SKIP_HEADER.
    pub fn change_skip_header(&self, skip_header: i64) -> String {
        self.change(Property::SkipHeader, &PropertyValue::Int(skip_header))
    }

    /// Alter SKIP_BLANK_LINES.
    pub fn change_skip_blank_lines(&self, skip_blank_lines: bool) -> String {
        self.change(Property::SkipBlankLines, &PropertyValue::Bool(skip_blank_lines))
    }

    /// Alter DATE_FORMAT.
    pub fn change_date_format(&self, date_format: &str) -> String {
        self.change(
            Property::DateFormat,
            &PropertyValue::String(date_format.to_string()),
        )
    }

    /// Alter TIME_FORMAT.
    pub fn change_time_format(&self, time_format: &str) -> String {
        self.change(
            Property::TimeFormat,
            &PropertyValue::String(time_format.to_string()),
        )
    }

    /// Alter TIMESTAMP_FORMAT.
    pub fn change_timestamp_format(&self, timestamp_format: &str) -> String {
        self.change(
            Property::TimestampFormat,
            &PropertyValue::String(timestamp_format.to_string()),
        )
    }

    /// Alter BINARY_FORMAT.
    pub fn change_binary_format(&self, binary_format: BinaryFormat) -> String {
        self.change(Property::BinaryFormat, &PropertyValue::BinaryFormat(binary_format))
    }

    /// Alter ESCAPE.
    pub fn change_escape(&self, escape: &str) -> String {
        self.change(Property::Escape, &PropertyValue::String(escape.to_string()))
    }

    /// Alter ESCAPE_UNENCLOSED_FIELD.
    pub fn change_escape_unenclosed_field(&self, escape: &str) -> String {
        self.change(
            Property::EscapeUnenclosedField,
            &PropertyValue::String(escape.to_string()),
        )
    }

    /// Alter FIELD_OPTIONALLY_ENCLOSED_BY.
    pub fn change_field_optionally_enclosed_by(&self, enclosed_by: &str) -> String {
        self.change(
            Property::FieldOptionallyEnclosedBy,
            &PropertyValue::String(enclosed_by.to_string()),
        )
    }

    /// Alter ERROR_ON_COLUMN_COUNT_MISMATCH.
    pub fn change_error_on_column_count_mismatch(&self, error: bool) -> String {
        self.change(Property::ErrorOnColumnCountMismatch, &PropertyValue::Bool(error))
    }

    /// Alter REPLACE_INVALID_CHARACTERS.
    pub fn change_replace_invalid_characters(&self, replace: bool) -> String {
        self.change(Property::ReplaceInvalidCharacters, &PropertyValue::Bool(replace))
    }

    /// Alter VALIDATE_UTF8.
    pub fn change_validate_utf8(&self, validate: bool) -> String {
        self.change(Property::ValidateUtf8, &PropertyValue::Bool(validate))
    }

    /// Alter EMPTY_FIELD_AS_NULL.
    pub fn change_empty_field_as_null(&self, empty_field_as_null: bool) -> String {
        self.change(Property::EmptyFieldAsNull, &PropertyValue::Bool(empty_field_as_null))
    }

    /// Alter SKIP_BYTE_ORDER_MARK.
    pub fn change_skip_byte_order_mark(&self, skip: bool) -> String {
        self.change(Property::SkipByteOrderMark, &PropertyValue::Bool(skip))
    }

    /// Alter ENCODING.
    pub fn change_encoding(&self, encoding: &str) -> String {
        self.change(Property::Encoding, &PropertyValue::String(encoding.to_string()))
    }

    /// `DROP FILE FORMAT`.
    pub fn drop(&self) -> String {
        format!("DROP FILE FORMAT {}", self.qualified_name())
    }

    /// `DESCRIBE FILE FORMAT`.
    pub fn describe(&self) -> String {
        format!("DESCRIBE FILE FORMAT {}", self.qualified_name())
    }

    /// `SHOW FILE FORMATS`, filtered by name within the database.
    ///
    /// Snowflake's `SHOW` cannot filter on schema here, so callers must pick
    /// the matching row themselves.
    pub fn show(&self) -> String {
        format!(
            "SHOW FILE FORMATS LIKE '{}' IN DATABASE \"{}\"",
            self.name, self.database
        )
    }
}
