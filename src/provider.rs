//! The provider service.
//!
//! [`ProviderService`] is the JSON-valued contract the host drives: schema,
//! validation, plan and the CRUD operations. [`SnowflakeProvider`] implements
//! it on top of a caller-supplied [`Connection`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::db::Connection;
use crate::error::ProviderError;
use crate::resources::file_format::{self, FileFormatSpec, RESOURCE_TYPE};
use crate::schema::{Diagnostic, ProviderSchema, Schema};
use crate::types::{ImportedResource, PlanResult, ProviderMetadata};
use crate::validation::{validate, validate_result};

/// Trait that provider implementations must implement.
///
/// # Example
///
/// ```ignore
/// use hemmer_provider_snowflake::{ProviderService, SnowflakeProvider};
///
/// let provider = SnowflakeProvider::new(my_connection);
/// let plan = provider
///     .plan("snowflake_file_format", None, config.clone(), config)
///     .await?;
/// let state = provider.create("snowflake_file_format", plan.planned_state).await?;
/// ```
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema including all resources.
    fn schema(&self) -> ProviderSchema;

    /// Return provider metadata. By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources: self.schema().resources.keys().cloned().collect(),
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&self.schema().provider, &config))
    }

    /// Configure the provider. Returns diagnostics (errors and warnings).
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Plan changes for a resource.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError>;

    /// Create a new resource.
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError>;

    /// Read the current state of a resource.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError>;

    /// Update an existing resource.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Import existing infrastructure into management.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        Err(ProviderError::Unimplemented(format!(
            "import_resource not implemented for {}",
            resource_type
        )))
    }
}

/// Manages Snowflake file formats through a shared connection.
pub struct SnowflakeProvider<C: Connection> {
    conn: Arc<C>,
}

impl<C: Connection> SnowflakeProvider<C> {
    /// Create a provider owning `conn`.
    pub fn new(conn: C) -> Self {
        Self::with_shared(Arc::new(conn))
    }

    /// Create a provider sharing `conn` with other callers.
    pub fn with_shared(conn: Arc<C>) -> Self {
        Self { conn }
    }

    /// The connection statements run on.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    fn resource_schema(&self, resource_type: &str) -> Result<Schema, ProviderError> {
        match resource_type {
            RESOURCE_TYPE => Ok(file_format::schema()),
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }
}

impl<C: Connection> Clone for SnowflakeProvider<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[async_trait::async_trait]
impl<C: Connection> ProviderService for SnowflakeProvider<C> {
    fn schema(&self) -> ProviderSchema {
        ProviderSchema::new().with_resource(RESOURCE_TYPE, file_format::schema())
    }

    #[instrument(skip(self, config), name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = self.validate_provider_config(config).await?;
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(diagnostics = diagnostics.len(), "Configure completed with errors");
        } else {
            info!("Provider configured");
        }
        Ok(diagnostics)
    }

    #[instrument(skip(self, config), name = "provider.validate_resource_config")]
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.resource_schema(resource_type)?;
        let diagnostics = validate(&schema, &config);
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(resource_type = %resource_type, diagnostics = diagnostics.len(), "ValidateResourceConfig completed with errors");
        } else {
            debug!(resource_type = %resource_type, "ValidateResourceConfig completed successfully");
        }
        Ok(diagnostics)
    }

    // Plans are computed from configuration and prior state only.
    #[instrument(skip(self, prior_state, _proposed_state, config), name = "provider.plan")]
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        _proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let schema = self.resource_schema(resource_type)?;

        if !config.is_null() {
            validate_result(&schema, &config).map_err(validation_error)?;
        }

        let result = file_format::plan(prior_state.as_ref(), &config).map_err(|e| {
            error!(resource_type = %resource_type, error = %e, "Plan failed");
            e
        })?;

        info!(
            resource_type = %resource_type,
            changes = result.changes.len(),
            requires_replace = result.requires_replace,
            "Plan completed"
        );
        Ok(result)
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let schema = self.resource_schema(resource_type)?;
        let mut planned_state = planned_state;
        schema.apply_defaults(&mut planned_state);

        let spec = FileFormatSpec::from_value(&planned_state)?;
        file_format::create(self.conn.as_ref(), &spec).await
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        self.resource_schema(resource_type)?;
        let id = state_id(&current_state)?;
        file_format::read(self.conn.as_ref(), id).await
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        self.resource_schema(resource_type)?;
        let id = state_id(&prior_state)?;
        let prior = FileFormatSpec::from_value(&prior_state)?;
        let planned = FileFormatSpec::from_value(&planned_state)?;

        file_format::update(self.conn.as_ref(), id, &prior.options, &planned.options).await
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        self.resource_schema(resource_type)?;
        let id = state_id(&current_state)?;
        file_format::delete(self.conn.as_ref(), id).await
    }

    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        self.resource_schema(resource_type)?;
        let state = file_format::import(self.conn.as_ref(), id).await?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }
}

fn state_id(state: &Value) -> Result<&str, ProviderError> {
    state
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Validation("state has no id".to_string()))
}

fn validation_error(diagnostics: Vec<Diagnostic>) -> ProviderError {
    let messages: Vec<String> = diagnostics
        .iter()
        .map(|d| match &d.detail {
            Some(detail) => format!("{}: {}", d.summary, detail),
            None => d.summary.clone(),
        })
        .collect();
    ProviderError::Validation(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Row;
    use crate::testing::{
        assert_error_contains, assert_no_errors, assert_plan_changes_attribute,
        assert_plan_creates, assert_plan_no_changes, assert_plan_replaces,
        assert_plan_updates_in_place, MockConnection, ProviderTester, TestError,
    };
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const QUALIFIED: &str = r#""db"."sc"."ff""#;

    fn config() -> Value {
        json!({"name": "ff", "database": "db", "schema": "sc", "type": "csv"})
    }

    fn expect_read(conn: MockConnection, skip_header: &str) -> MockConnection {
        conn.expect_query(
            format!("DESCRIBE FILE FORMAT {}", QUALIFIED),
            vec![
                Row::new()
                    .with("property", "TYPE")
                    .with("property_type", "String")
                    .with("property_value", "CSV")
                    .with("property_default", "CSV"),
                Row::new()
                    .with("property", "SKIP_HEADER")
                    .with("property_type", "Integer")
                    .with("property_value", skip_header)
                    .with("property_default", "0"),
            ],
        )
        .expect_query(
            r#"SHOW FILE FORMATS LIKE 'ff' IN DATABASE "db""#,
            vec![
                Row::new()
                    .with("name", "ff")
                    .with("database_name", "db")
                    .with("schema_name", "other")
                    .with_null("comment"),
                Row::new()
                    .with("name", "ff")
                    .with("database_name", "db")
                    .with("schema_name", "sc")
                    .with("owner", "SYSADMIN")
                    .with_null("comment")
                    .with("created_on", "2024-05-01 10:00:00.000 +0000"),
            ],
        )
    }

    fn tester(conn: MockConnection) -> ProviderTester<SnowflakeProvider<MockConnection>> {
        ProviderTester::new(SnowflakeProvider::new(conn))
    }

    #[test]
    fn test_metadata_lists_file_format() {
        let tester = tester(MockConnection::new());
        assert_eq!(tester.resource_types(), vec![RESOURCE_TYPE.to_string()]);
        assert_eq!(tester.provider().metadata().name, "hemmer-provider-snowflake");
    }

    #[tokio::test]
    async fn test_configure_rejects_unknown_settings() {
        let tester = tester(MockConnection::new());
        assert_ok!(tester.configure(json!({})).await);

        match tester.configure(json!({"account": "x"})).await {
            Err(TestError::Diagnostics(diagnostics)) => {
                assert_error_contains(&diagnostics, "Unsupported attribute")
            },
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let provider = SnowflakeProvider::new(MockConnection::new());

        let diagnostics = provider
            .validate_resource_config(RESOURCE_TYPE, config())
            .await
            .unwrap();
        assert_no_errors(&diagnostics);

        let mut bad = config();
        bad["type"] = json!("avro");
        let diagnostics = provider
            .validate_resource_config(RESOURCE_TYPE, bad)
            .await
            .unwrap();
        assert_error_contains(&diagnostics, "Invalid value for attribute 'type'");
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let tester = tester(MockConnection::new());
        let err = assert_err!(tester.read("snowflake_stage", json!({"id": "a|b|c"})).await);
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_plan_rejects_invalid_config() {
        let tester = tester(MockConnection::new());
        let mut bad = config();
        bad["skip_header"] = json!("one");

        let err = assert_err!(tester.plan_create(RESOURCE_TYPE, bad).await);
        assert!(matches!(err, ProviderError::Validation(_)));
        assert!(err.to_string().contains("skip_header"));
    }

    #[tokio::test]
    async fn test_lifecycle_create_picks_matching_schema_row() {
        let conn = expect_read(
            MockConnection::new().expect_exec(format!(
                r#"CREATE FILE FORMAT {} TYPE = "csv" BINARY_AS_TEXT = true TRIM_SPACE = false SKIP_HEADER = 1"#,
                QUALIFIED
            )),
            "1",
        );
        let tester = tester(conn);

        let mut config = config();
        config["skip_header"] = json!(1);

        let plan = tester.plan_create(RESOURCE_TYPE, config.clone()).await.unwrap();
        assert_plan_creates(&plan);

        let state = tester.lifecycle_create(RESOURCE_TYPE, config).await.unwrap();
        tester.provider().connection().assert_done();

        assert_eq!(state["id"], json!("db|sc|ff"));
        assert_eq!(state["schema"], json!("sc"));
        assert_eq!(state["owner"], json!("SYSADMIN"));
        assert_eq!(state["comment"], json!(""));
        assert_eq!(state["type"], json!("csv"));
        assert_eq!(state["skip_header"], json!(1));
    }

    #[tokio::test]
    async fn test_lifecycle_update_in_place() {
        let conn = expect_read(expect_read(MockConnection::new(), "1"), "1")
            .expect_exec(format!(r#"ALTER FILE FORMAT {} SET SKIP_HEADER = 2"#, QUALIFIED));
        let conn = expect_read(conn, "2");
        let tester = tester(conn);

        let state = tester.read(RESOURCE_TYPE, json!({"id": "db|sc|ff"})).await.unwrap();

        let unchanged = tester.read(RESOURCE_TYPE, state.clone()).await.unwrap();
        let plan = tester
            .plan_update(RESOURCE_TYPE, unchanged.clone(), config())
            .await
            .unwrap();
        assert_plan_no_changes(&plan);

        let mut updated = config();
        updated["skip_header"] = json!(2);
        let plan = tester
            .plan_update(RESOURCE_TYPE, unchanged.clone(), updated.clone())
            .await
            .unwrap();
        assert_plan_changes_attribute(&plan, "skip_header");
        assert_plan_updates_in_place(&plan);

        let state = tester
            .lifecycle_update(RESOURCE_TYPE, unchanged, updated)
            .await
            .unwrap();
        tester.provider().connection().assert_done();
        assert_eq!(state["skip_header"], json!(2));
        assert_eq!(state["binary_as_text"], json!(false));
    }

    #[tokio::test]
    async fn test_plan_rename_replaces() {
        let tester = tester(expect_read(MockConnection::new(), "0"));
        let state = tester.read(RESOURCE_TYPE, json!({"id": "db|sc|ff"})).await.unwrap();

        let mut renamed = config();
        renamed["name"] = json!("ff2");
        let plan = tester.plan_update(RESOURCE_TYPE, state, renamed).await.unwrap();
        assert_plan_replaces(&plan);
    }

    #[tokio::test]
    async fn test_plan_delete() {
        let tester = tester(MockConnection::new());
        let plan = tester
            .plan_delete(RESOURCE_TYPE, json!({"id": "db|sc|ff", "name": "ff"}))
            .await
            .unwrap();
        assert_eq!(plan.planned_state, Value::Null);
        assert_eq!(plan.changes.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_and_import() {
        let conn = expect_read(
            MockConnection::new().expect_exec(format!("DROP FILE FORMAT {}", QUALIFIED)),
            "0",
        );
        let tester = tester(conn);

        assert_ok!(tester.delete(RESOURCE_TYPE, json!({"id": "db|sc|ff"})).await);

        let imported = tester.import_resource(RESOURCE_TYPE, "db|sc|ff").await.unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].resource_type, RESOURCE_TYPE);
        assert_eq!(imported[0].state["id"], json!("db|sc|ff"));
        tester.provider().connection().assert_done();
    }

    #[tokio::test]
    async fn test_state_without_id() {
        let tester = tester(MockConnection::new());
        let err = assert_err!(tester.delete(RESOURCE_TYPE, json!({"name": "ff"})).await);
        assert_eq!(err.to_string(), "Validation error: state has no id");
    }

    struct SchemaOnly;

    #[async_trait::async_trait]
    impl ProviderService for SchemaOnly {
        fn schema(&self) -> ProviderSchema {
            ProviderSchema::new().with_resource(RESOURCE_TYPE, file_format::schema())
        }

        async fn configure(&self, _config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
            Ok(vec![])
        }

        async fn validate_resource_config(
            &self,
            _resource_type: &str,
            _config: Value,
        ) -> Result<Vec<Diagnostic>, ProviderError> {
            Ok(vec![])
        }

        async fn plan(
            &self,
            _resource_type: &str,
            _prior_state: Option<Value>,
            _proposed_state: Value,
            _config: Value,
        ) -> Result<PlanResult, ProviderError> {
            Ok(PlanResult::no_change(Value::Null))
        }

        async fn create(&self, _resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
            Ok(planned_state)
        }

        async fn read(&self, _resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
            Ok(current_state)
        }

        async fn update(
            &self,
            _resource_type: &str,
            _prior_state: Value,
            planned_state: Value,
        ) -> Result<Value, ProviderError> {
            Ok(planned_state)
        }

        async fn delete(&self, _resource_type: &str, _current_state: Value) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_import_is_unimplemented() {
        let provider = SchemaOnly;
        let err = assert_err!(provider.import_resource(RESOURCE_TYPE, "db|sc|ff").await);
        assert!(matches!(err, ProviderError::Unimplemented(_)));
        assert_eq!(provider.metadata().resources, vec![RESOURCE_TYPE.to_string()]);
    }
}
