//! Hemmer provider for Snowflake file formats
//!
//! This crate manages Snowflake `FILE FORMAT` objects declaratively. Resource
//! configuration is validated against a schema, planned against the last
//! known state and applied as `CREATE` / `ALTER` / `DROP` statements; state is
//! read back from `DESCRIBE FILE FORMAT` and `SHOW FILE FORMATS`.
//!
//! # Overview
//!
//! - **[`snowflake`]**: DDL generation and decoding of introspection results
//! - **[`resources`]**: The `snowflake_file_format` resource: schema, plan,
//!   lifecycle and the `database|schema|name` identifier
//! - **[`ProviderService`]**: The trait the host drives, implemented by
//!   [`SnowflakeProvider`]
//! - **[`db`]**: The [`Connection`] trait statements are run through
//! - **Schema and validation**: Attribute schemas and diagnostics
//! - **Logging**: Integration with `tracing` for structured logging
//! - **Testing**: [`testing::ProviderTester`] and [`testing::MockConnection`]
//!
//! # Quick Start
//!
//! ```ignore
//! use hemmer_provider_snowflake::{init_logging, ProviderService, SnowflakeProvider};
//! use serde_json::json;
//!
//! init_logging();
//!
//! let provider = SnowflakeProvider::new(my_connection);
//! let config = json!({
//!     "name": "csv_gzip",
//!     "database": "analytics",
//!     "schema": "staging",
//!     "type": "csv",
//!     "compression": "gzip",
//!     "skip_header": 1,
//! });
//!
//! let plan = provider
//!     .plan("snowflake_file_format", None, config.clone(), config)
//!     .await?;
//! let state = provider
//!     .create("snowflake_file_format", plan.planned_state)
//!     .await?;
//! assert_eq!(state["id"], "analytics|staging|csv_gzip");
//! ```
//!
//! The connection is supplied by the caller: the crate never opens, pools or
//! closes database connections, and runs every statement to completion one at
//! a time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod db;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod snowflake;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use db::{Connection, DbError, Row};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{ProviderService, SnowflakeProvider};
pub use resources::{FileFormatId, FileFormatSpec};
pub use schema::ProviderSchema;
pub use types::{AttributeChange, ImportedResource, PlanResult, ProviderMetadata};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
