//! The database handle the provider runs its statements through.
//!
//! The provider never opens, pools or closes connections. Callers hand it
//! something implementing [`Connection`] and every lifecycle operation
//! awaits one statement at a time on it.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`Connection`].
#[derive(Debug, Error)]
pub enum DbError {
    /// The warehouse rejected or failed to run the statement.
    #[error("{0}")]
    Statement(String),
}

/// A single row of a query result, keyed by column name.
///
/// Column names are matched case-insensitively, since warehouse drivers
/// disagree on the case they report them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Option<String>)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-null column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push((column.into(), Some(value.into())));
        self
    }

    /// Add a NULL column value.
    pub fn with_null(mut self, column: impl Into<String>) -> Self {
        self.columns.push((column.into(), None));
        self
    }

    /// Look up a column. Returns `None` if the column is absent,
    /// `Some(None)` if it is present but NULL.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_deref())
    }

    /// Look up a column, treating NULL and absent alike.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).flatten()
    }
}

/// A query/exec interface to the warehouse.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Execute a statement that returns no rows. Returns the affected row count.
    async fn exec(&self, sql: &str) -> Result<u64, DbError>;

    /// Execute a statement and collect its rows.
    async fn query(&self, sql: &str) -> Result<Vec<Row>, DbError>;
}
