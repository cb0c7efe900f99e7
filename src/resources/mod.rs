//! Resources managed by the provider.

pub mod file_format;
pub mod id;
pub mod plan;

pub use file_format::{FileFormatSpec, RESOURCE_TYPE as FILE_FORMAT};
pub use id::{FileFormatId, IdError};
