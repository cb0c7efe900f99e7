//! Snowflake DDL generation and result decoding for file formats.
//!
//! Nothing in here touches a connection: [`FileFormatBuilder`] produces SQL
//! text and the [`describe`] functions decode rows someone else fetched.

pub mod describe;
pub mod escape;
pub mod file_format;

pub use describe::{
    parse_describe, parse_list, parse_show, DecodeError, DescribeRow, FileFormatMetadata,
    FileFormatProperties,
};
pub use escape::{escape_string, unescape_string};
pub use file_format::{
    BinaryFormat, Compression, FileFormatBuilder, FileFormatOptions, FileFormatType, Property,
    PropertyValue, UnsupportedValue,
};
