//! Testing utilities for the provider.
//!
//! [`ProviderTester`] drives a [`ProviderService`] without a host process,
//! and [`MockConnection`] stands in for the warehouse: it expects an exact
//! sequence of statements and answers each with canned rows or an error.
//!
//! # Example
//!
//! ```ignore
//! use hemmer_provider_snowflake::testing::{MockConnection, ProviderTester};
//! use hemmer_provider_snowflake::SnowflakeProvider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_delete() {
//!     let conn = MockConnection::new()
//!         .expect_exec(r#"DROP FILE FORMAT "db"."sc"."ff""#);
//!     let tester = ProviderTester::new(SnowflakeProvider::new(conn));
//!
//!     tester
//!         .delete("snowflake_file_format", json!({"id": "db|sc|ff"}))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::db::{Connection, DbError, Row};
use crate::error::ProviderError;
use crate::provider::ProviderService;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::types::{ImportedResource, PlanResult};

/// A test harness for provider implementations.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate provider configuration.
    ///
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    ///
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource configuration.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Plan a resource creation (no prior state).
    pub async fn plan_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, None, config.clone(), config)
            .await
    }

    /// Plan a resource update.
    pub async fn plan_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), config.clone(), config)
            .await
    }

    /// Plan a resource deletion.
    pub async fn plan_delete(
        &self,
        resource_type: &str,
        prior_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        self.provider
            .plan(resource_type, Some(prior_state), Value::Null, Value::Null)
            .await
    }

    /// Create a new resource.
    pub async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.provider.import_resource(resource_type, id).await
    }

    // =========================================================================
    // Lifecycle Helpers
    // =========================================================================

    /// Run plan → create, returning the created state.
    ///
    /// Create already reads the object back, so no separate read is issued.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self.plan_create(resource_type, config).await?;
        self.create(resource_type, plan_result.planned_state).await
    }

    /// Run plan → update, returning the state read back after the update.
    pub async fn lifecycle_update(
        &self,
        resource_type: &str,
        prior_state: Value,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let plan_result = self
            .plan_update(resource_type, prior_state.clone(), config)
            .await?;
        self.update(resource_type, prior_state, plan_result.planned_state)
            .await
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics
        .into_iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Mock Connection
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Exec,
    Query,
}

#[derive(Debug, Clone)]
enum Outcome {
    Affected(u64),
    Rows(Vec<Row>),
    Error(String),
}

#[derive(Debug, Clone)]
struct Expectation {
    kind: StatementKind,
    sql: String,
    outcome: Outcome,
}

/// A [`Connection`] that expects an exact, ordered sequence of statements.
///
/// Each statement must match the next expectation's kind and SQL text
/// exactly. A mismatch fails that call with [`DbError::Statement`] and leaves
/// the expectation queued.
#[derive(Debug, Default)]
pub struct MockConnection {
    expectations: Mutex<VecDeque<Expectation>>,
    executed: Mutex<Vec<String>>,
}

impl MockConnection {
    /// Create a connection with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    fn expect(self, kind: StatementKind, sql: impl Into<String>, outcome: Outcome) -> Self {
        lock(&self.expectations).push_back(Expectation {
            kind,
            sql: sql.into(),
            outcome,
        });
        self
    }

    /// Expect `sql` through [`Connection::exec`], affecting one row.
    pub fn expect_exec(self, sql: impl Into<String>) -> Self {
        self.expect(StatementKind::Exec, sql, Outcome::Affected(1))
    }

    /// Expect `sql` through [`Connection::exec`] and fail it.
    pub fn expect_exec_error(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.expect(StatementKind::Exec, sql, Outcome::Error(message.into()))
    }

    /// Expect `sql` through [`Connection::query`], returning `rows`.
    pub fn expect_query(self, sql: impl Into<String>, rows: Vec<Row>) -> Self {
        self.expect(StatementKind::Query, sql, Outcome::Rows(rows))
    }

    /// Expect `sql` through [`Connection::query`] and fail it.
    pub fn expect_query_error(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.expect(StatementKind::Query, sql, Outcome::Error(message.into()))
    }

    /// Every statement received so far, matched or not.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.expectations).len()
    }

    /// Assert that every expectation was consumed.
    ///
    /// # Panics
    ///
    /// Panics listing the statements still expected.
    pub fn assert_done(&self) {
        let pending: Vec<String> = lock(&self.expectations)
            .iter()
            .map(|e| e.sql.clone())
            .collect();
        assert!(
            pending.is_empty(),
            "Expected {} more statement(s): {:?}",
            pending.len(),
            pending
        );
    }

    fn next(&self, kind: StatementKind, sql: &str) -> Result<Outcome, DbError> {
        lock(&self.executed).push(sql.to_string());

        let mut expectations = lock(&self.expectations);
        let matches = expectations
            .front()
            .is_some_and(|e| e.kind == kind && e.sql == sql);
        if !matches {
            return Err(DbError::Statement(match expectations.front() {
                Some(next) => format!(
                    "unexpected {:?} {:?}, expected {:?} {:?}",
                    kind, sql, next.kind, next.sql
                ),
                None => format!("unexpected {:?} {:?}, no statements expected", kind, sql),
            }));
        }

        match expectations.pop_front().map(|e| e.outcome) {
            Some(Outcome::Error(message)) => Err(DbError::Statement(message)),
            Some(outcome) => Ok(outcome),
            None => Err(DbError::Statement(format!("unexpected {:?} {:?}", kind, sql))),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn exec(&self, sql: &str) -> Result<u64, DbError> {
        match self.next(StatementKind::Exec, sql)? {
            Outcome::Affected(n) => Ok(n),
            Outcome::Rows(rows) => Ok(rows.len() as u64),
            Outcome::Error(message) => Err(DbError::Statement(message)),
        }
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>, DbError> {
        match self.next(StatementKind::Query, sql)? {
            Outcome::Rows(rows) => Ok(rows),
            Outcome::Affected(_) => Ok(Vec::new()),
            Outcome::Error(message) => Err(DbError::Statement(message)),
        }
    }
}

// A panicking test must not take every later assertion down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that a plan result indicates the resource will be created.
///
/// # Panics
///
/// Panics if the plan has no changes or requires replacement.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(
        !plan.changes.is_empty(),
        "Expected plan to have changes for create, but got no changes"
    );
    assert!(
        !plan.requires_replace,
        "Expected plan to create, not replace"
    );
}

/// Assert that a plan result indicates no changes.
///
/// # Panics
///
/// Panics if the plan has any changes.
pub fn assert_plan_no_changes(plan: &PlanResult) {
    assert!(
        plan.changes.is_empty(),
        "Expected no changes, but got {} change(s): {:?}",
        plan.changes.len(),
        plan.changed_paths()
    );
}

/// Assert that a plan requires resource replacement.
///
/// # Panics
///
/// Panics if the plan does not require replacement.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(
        plan.requires_replace,
        "Expected plan to require replacement, but it does not"
    );
}

/// Assert that a plan does not require resource replacement.
///
/// # Panics
///
/// Panics if the plan requires replacement.
pub fn assert_plan_updates_in_place(plan: &PlanResult) {
    assert!(
        !plan.requires_replace,
        "Expected plan to update in place, but it requires replacement"
    );
}

/// Assert that a plan has a change for a specific attribute path.
///
/// # Panics
///
/// Panics if the plan does not have a change for the given path.
pub fn assert_plan_changes_attribute(plan: &PlanResult, path: &str) {
    let has_change = plan.changes.iter().any(|c| c.path == path);
    assert!(
        has_change,
        "Expected plan to change attribute '{}', but it was not changed. Changed attributes: {:?}",
        path,
        plan.changed_paths()
    );
}

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let has_matching_error = diagnostics
        .iter()
        .any(|d| d.is_error() && d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| &d.summary)
            .collect::<Vec<_>>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_mock_answers_in_order() {
        let conn = MockConnection::new()
            .expect_exec("CREATE X")
            .expect_query("SHOW X", vec![Row::new().with("name", "x")]);

        assert_eq!(assert_ok!(conn.exec("CREATE X").await), 1);
        let rows = assert_ok!(conn.query("SHOW X").await);
        assert_eq!(rows[0].get_str("name"), Some("x"));

        conn.assert_done();
        assert_eq!(conn.executed(), vec!["CREATE X", "SHOW X"]);
    }

    #[tokio::test]
    async fn test_mock_rejects_unexpected_statement() {
        let conn = MockConnection::new().expect_exec("DROP X");

        let err = assert_err!(conn.exec("DROP Y").await);
        assert!(err.to_string().contains("expected Exec \"DROP X\""));
        assert_eq!(conn.remaining(), 1);
    }

    #[tokio::test]
    async fn test_mock_rejects_wrong_kind() {
        let conn = MockConnection::new().expect_query("SHOW X", vec![]);

        assert_err!(conn.exec("SHOW X").await);
        assert_eq!(conn.remaining(), 1);
    }

    #[tokio::test]
    async fn test_mock_canned_error() {
        let conn = MockConnection::new().expect_exec_error("ALTER X", "insufficient privileges");

        let err = assert_err!(conn.exec("ALTER X").await);
        assert_eq!(err.to_string(), "insufficient privileges");
        conn.assert_done();
    }

    #[tokio::test]
    async fn test_mock_nothing_expected() {
        let conn = MockConnection::new();
        let err = assert_err!(conn.query("SHOW X").await);
        assert!(err.to_string().contains("no statements expected"));
    }

    #[test]
    #[should_panic(expected = "Expected 1 more statement(s)")]
    fn test_assert_done_fails_with_pending() {
        MockConnection::new().expect_exec("DROP X").assert_done();
    }

    #[test]
    fn test_assert_no_errors() {
        assert_no_errors(&[Diagnostic::warning("Just a warning")]);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        assert_no_errors(&[Diagnostic::error("An error")]);
    }

    #[test]
    fn test_assert_error_contains() {
        let diagnostics = vec![Diagnostic::error("Invalid value for attribute 'type'")];
        assert_error_contains(&diagnostics, "Invalid value");
        assert_error_contains(&diagnostics, "'type'");
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(vec![
            Diagnostic::error("First error").with_attribute("field1"),
            Diagnostic::error("Second error").with_detail("More info"),
        ]);

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("field1"));
        assert!(display.contains("More info"));
    }
}
