//! The `snowflake_file_format` resource.
//!
//! Create, Read, Update, Delete and Import run one statement at a time on the
//! supplied [`Connection`]. Read merges two queries: `DESCRIBE` for the
//! property values and `SHOW` for the name, comment, owner and creation time.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::id::FileFormatId;
use super::plan::plan_changes;
use crate::db::{Connection, Row};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::snowflake::{
    parse_describe, parse_show, BinaryFormat, Compression, FileFormatBuilder, FileFormatMetadata,
    FileFormatOptions, FileFormatProperties, FileFormatType, Property, PropertyValue,
};
use crate::types::PlanResult;

/// The resource type name.
pub const RESOURCE_TYPE: &str = "snowflake_file_format";

/// Desired state of a file format, decoded from configuration or state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFormatSpec {
    /// File format name.
    pub name: String,
    /// Database to create it in.
    pub database: String,
    /// Schema to create it in.
    pub schema: String,
    /// Everything else.
    #[serde(flatten)]
    pub options: FileFormatOptions,
}

impl FileFormatSpec {
    /// Decode from a JSON configuration or state object. Unknown keys
    /// (`id`, `owner`, ...) are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ProviderError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The identifier this file format will have.
    pub fn id(&self) -> FileFormatId {
        FileFormatId::new(&self.database, &self.schema, &self.name)
    }

    /// A statement builder carrying every set option.
    pub fn builder(&self) -> FileFormatBuilder {
        FileFormatBuilder::new(&self.name, &self.database, &self.schema)
            .with_options(self.options.clone())
    }
}

/// The resource schema.
pub fn schema() -> Schema {
    Schema::v0()
        .with_description("A named set of options describing staged data files.")
        .with_attribute("id", Attribute::computed_string()
            .with_description("The identifier, formatted as database|schema|name."))
        .with_attribute("name", Attribute::required_string()
            .with_description("Specifies the identifier for the file format; must be unique for the schema in which the file format is created.")
            .with_force_new())
        .with_attribute("database", Attribute::required_string()
            .with_description("The database in which to create the file format.")
            .with_force_new())
        .with_attribute("schema", Attribute::required_string()
            .with_description("The schema in which to create the file format.")
            .with_force_new())
        .with_attribute("type", Attribute::required_string()
            .with_description("Specifies the format of the input files (for data loading) or output files (for data unloading). Depending on the format type, additional format-specific options can be specified.")
            .with_force_new()
            .with_allowed_values(FileFormatType::VALUES.iter().copied()))
        .with_attribute("comment", Attribute::optional_string()
            .with_description("Specifies a comment for the file format."))
        .with_attribute("owner", Attribute::computed_string()
            .with_description("The role that owns the file format."))
        .with_attribute("created_on", Attribute::computed_string()
            .with_description("When the file format was created."))
        .with_attribute("compression", Attribute::optional_computed_string()
            .with_description("Specifies the current compression algorithm for columns in the Parquet files.")
            .with_allowed_values(Compression::VALUES.iter().copied()))
        .with_attribute("binary_as_text", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to interpret columns with no defined logical data type as UTF-8 text. When set to FALSE, Snowflake interprets these columns as binary data.")
            .with_default(json!(true)))
        .with_attribute("trim_space", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to remove leading and trailing white space from strings.")
            .with_default(json!(false)))
        .with_attribute("null_if", Attribute::optional_computed_string_list()
            .with_description("String used to convert to and from SQL NULL. Snowflake replaces these strings in the data load source with SQL NULL."))
        .with_attribute("record_delimiter", Attribute::optional_computed_string()
            .with_description("One or more singlebyte or multibyte characters that separate records in an input file (data loading) or unloaded file (data unloading)."))
        .with_attribute("field_delimiter", Attribute::optional_computed_string()
            .with_description("One or more singlebyte or multibyte characters that separate fields in an input file (data loading) or unloaded file (data unloading)."))
        .with_attribute("file_extension", Attribute::optional_computed_string()
            .with_description("Specifies the extension for files unloaded to a stage."))
        .with_attribute("skip_header", Attribute::optional_computed_int64()
            .with_description("Number of lines at the start of the file to skip."))
        .with_attribute("skip_blank_lines", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies to skip any blank lines encountered in the data files."))
        .with_attribute("date_format", Attribute::optional_computed_string()
            .with_description("Defines the format of date values in the data files (data loading) or table (data unloading)."))
        .with_attribute("time_format", Attribute::optional_computed_string()
            .with_description("Defines the format of time values in the data files (data loading) or table (data unloading)."))
        .with_attribute("timestamp_format", Attribute::optional_computed_string()
            .with_description("Defines the format of timestamp values in the data files (data loading) or table (data unloading)."))
        .with_attribute("binary_format", Attribute::optional_computed_string()
            .with_description("Defines the encoding format for binary input or output.")
            .with_allowed_values(BinaryFormat::VALUES.iter().copied()))
        .with_attribute("escape", Attribute::optional_computed_string()
            .with_description("Single character string used as the escape character for field values."))
        .with_attribute("escape_unenclosed_field", Attribute::optional_computed_string()
            .with_description("Single character string used as the escape character for unenclosed field values only."))
        .with_attribute("field_optionally_enclosed_by", Attribute::optional_computed_string()
            .with_description("Character used to enclose strings."))
        .with_attribute("error_on_column_count_mismatch", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to generate a parsing error if the number of delimited columns (i.e. fields) in an input file does not match the number of columns in the corresponding table."))
        .with_attribute("replace_invalid_characters", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to replace invalid UTF-8 characters with the Unicode replacement character."))
        .with_attribute("validate_utf8", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to validate UTF-8 character encoding in string column data."))
        .with_attribute("empty_field_as_null", Attribute::optional_computed_bool()
            .with_description("Specifies whether to insert SQL NULL for empty fields in an input file, which are represented by two successive delimiters."))
        .with_attribute("skip_byte_order_mark", Attribute::optional_computed_bool()
            .with_description("Boolean that specifies whether to skip the BOM (byte order mark), if present in a data file."))
        .with_attribute("encoding", Attribute::optional_computed_string()
            .with_description("String (constant) that specifies the character set of the source data when loading data into a table."))
}

/// Plan the change from `prior` (absent on create) to `config` (null on delete).
///
/// On create, schema defaults are filled in. Once the file format exists,
/// omitted attributes keep whatever Read observed instead: Snowflake does not
/// report Parquet-only options such as `BINARY_AS_TEXT` for other types.
///
/// Enum values are rewritten to the case Read reports them in, so `"GZIP"` in
/// configuration doesn't diff against `"gzip"` in state.
pub fn plan(prior: Option<&Value>, config: &Value) -> Result<PlanResult, ProviderError> {
    let schema = schema();
    if config.is_null() {
        return Ok(plan_changes(&schema, prior, config));
    }

    let mut config = config.clone();
    if prior.is_none() {
        schema.apply_defaults(&mut config);
    }
    let normalized = normalize(&config)?;

    Ok(plan_changes(&schema, prior, &normalized))
}

fn normalize(config: &Value) -> Result<Value, ProviderError> {
    let spec = FileFormatSpec::from_value(config)?;
    let mut value = serde_json::to_value(&spec)?;
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    Ok(value)
}

/// Create the file format, then read it back.
pub async fn create<C>(conn: &C, spec: &FileFormatSpec) -> Result<Value, ProviderError>
where
    C: Connection + ?Sized,
{
    info!(resource_type = RESOURCE_TYPE, name = %spec.name, database = %spec.database, schema = %spec.schema, "Creating file format");

    let builder = spec.builder();
    exec(
        conn,
        &builder.create(),
        format!("error creating file format {}", spec.name),
    )
    .await?;

    let id = spec.id().encode()?;
    info!(resource_type = RESOURCE_TYPE, id = %id, "Created file format");

    read(conn, &id).await
}

/// Read the file format identified by `id` into a state object.
///
/// A file format that no longer exists is reported as an error like any
/// other failed query.
pub async fn read<C>(conn: &C, id: &str) -> Result<Value, ProviderError>
where
    C: Connection + ?Sized,
{
    debug!(resource_type = RESOURCE_TYPE, id = %id, "Reading file format");

    let file_format_id = FileFormatId::decode(id)?;
    let builder = builder_for(&file_format_id);

    let rows = query(
        conn,
        &builder.describe(),
        format!("error describing file format {}", id),
    )
    .await?;
    let properties = parse_describe(&rows)?;

    let rows = query(
        conn,
        &builder.show(),
        format!("error showing file format {}", id),
    )
    .await?;
    let metadata = parse_show(
        &rows,
        &file_format_id.name,
        &file_format_id.database,
        &file_format_id.schema,
    )?;

    Ok(state(id, &metadata, &properties))
}

/// Apply every property that differs between `prior` and `planned`, one
/// `ALTER` each in declaration order, then read the file format back.
///
/// The first failing statement stops the update. If earlier statements had
/// already succeeded the error is [`ProviderError::PartialUpdate`] naming
/// them.
pub async fn update<C>(
    conn: &C,
    id: &str,
    prior: &FileFormatOptions,
    planned: &FileFormatOptions,
) -> Result<Value, ProviderError>
where
    C: Connection + ?Sized,
{
    info!(resource_type = RESOURCE_TYPE, id = %id, "Updating file format");

    let builder = builder_for(&FileFormatId::decode(id)?);
    let mut committed: Vec<String> = Vec::new();

    for property in Property::ALL {
        // Changing the type replaces the file format.
        if property == Property::Type {
            continue;
        }
        let Some(value) = desired_value(property, planned) else {
            continue;
        };
        if prior.get(property).as_ref() == Some(&value) {
            continue;
        }

        debug!(id = %id, property = %property, "Altering file format property");
        let result = exec(
            conn,
            &builder.change(property, &value),
            format!("error updating file format {} on {}", property, id),
        )
        .await;

        if let Err(err) = result {
            if committed.is_empty() {
                return Err(err);
            }
            return Err(ProviderError::PartialUpdate {
                committed,
                source: Box::new(err),
            });
        }
        committed.push(property.attribute().to_string());
    }

    info!(resource_type = RESOURCE_TYPE, id = %id, changed = committed.len(), "Updated file format");
    read(conn, id).await
}

/// Drop the file format.
pub async fn delete<C>(conn: &C, id: &str) -> Result<(), ProviderError>
where
    C: Connection + ?Sized,
{
    info!(resource_type = RESOURCE_TYPE, id = %id, "Deleting file format");

    let builder = builder_for(&FileFormatId::decode(id)?);
    exec(
        conn,
        &builder.drop(),
        format!("error deleting file format {}", id),
    )
    .await?;

    Ok(())
}

/// Adopt an existing file format: `id` becomes the resource id as given.
pub async fn import<C>(conn: &C, id: &str) -> Result<Value, ProviderError>
where
    C: Connection + ?Sized,
{
    info!(resource_type = RESOURCE_TYPE, id = %id, "Importing file format");
    read(conn, id).await
}

fn builder_for(id: &FileFormatId) -> FileFormatBuilder {
    FileFormatBuilder::new(&id.name, &id.database, &id.schema)
}

// Clearing the comment sets it to the empty string; other properties have
// no "unset" statement and are left alone.
fn desired_value(property: Property, planned: &FileFormatOptions) -> Option<PropertyValue> {
    match (planned.get(property), property) {
        (Some(value), _) => Some(value),
        (None, Property::Comment) => Some(PropertyValue::String(String::new())),
        (None, _) => None,
    }
}

fn state(id: &str, metadata: &FileFormatMetadata, p: &FileFormatProperties) -> Value {
    json!({
        "id": id,
        "name": metadata.name,
        "database": metadata.database_name,
        "schema": metadata.schema_name,
        "comment": metadata.comment,
        "owner": metadata.owner,
        "created_on": metadata.created_on,
        "type": p.format_type,
        "compression": p.compression,
        "binary_as_text": p.binary_as_text,
        "trim_space": p.trim_space,
        "null_if": p.null_if,
        "record_delimiter": p.record_delimiter,
        "field_delimiter": p.field_delimiter,
        "file_extension": p.file_extension,
        "skip_header": p.skip_header,
        "skip_blank_lines": p.skip_blank_lines,
        "date_format": p.date_format,
        "time_format": p.time_format,
        "timestamp_format": p.timestamp_format,
        "binary_format": p.binary_format,
        "escape": p.escape,
        "escape_unenclosed_field": p.escape_unenclosed_field,
        "field_optionally_enclosed_by": p.field_optionally_enclosed_by,
        "error_on_column_count_mismatch": p.error_on_column_count_mismatch,
        "replace_invalid_characters": p.replace_invalid_characters,
        "validate_utf8": p.validate_utf8,
        "empty_field_as_null": p.empty_field_as_null,
        "skip_byte_order_mark": p.skip_byte_order_mark,
        "encoding": p.encoding,
    })
}

async fn exec<C>(conn: &C, sql: &str, context: String) -> Result<u64, ProviderError>
where
    C: Connection + ?Sized,
{
    debug!(sql = %sql, "Executing statement");
    conn.exec(sql).await.map_err(|source| {
        let err = ProviderError::database(context, source);
        error!(error = %err, "Statement failed");
        err
    })
}

async fn query<C>(conn: &C, sql: &str, context: String) -> Result<Vec<Row>, ProviderError>
where
    C: Connection + ?Sized,
{
    debug!(sql = %sql, "Running query");
    conn.query(sql).await.map_err(|source| {
        let err = ProviderError::database(context, source);
        error!(error = %err, "Query failed");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::testing::MockConnection;
    use crate::validation::validate;
    use tokio_test::{assert_err, assert_ok};

    const ID: &str = "test_db|test_schema|test_file_format";
    const QUALIFIED: &str = r#""test_db"."test_schema"."test_file_format""#;

    fn describe_sql() -> String {
        format!("DESCRIBE FILE FORMAT {}", QUALIFIED)
    }

    fn show_sql() -> String {
        r#"SHOW FILE FORMATS LIKE 'test_file_format' IN DATABASE "test_db""#.to_string()
    }

    fn describe_rows() -> Vec<Row> {
        let row = |property: &str, kind: &str, value: &str, default: &str| {
            Row::new()
                .with("property", property)
                .with("property_type", kind)
                .with("property_value", value)
                .with("property_default", default)
        };
        vec![
            row("TYPE", "String", "parquet", "CSV"),
            row("TRIM_SPACE", "Boolean", "false", "false"),
            row("NULL_IF", "List", r#"["\\N","NULL",""]"#, r#"["\\N"]"#),
            row("COMPRESSION", "String", "AUTO", "AUTO"),
            row("BINARY_AS_TEXT", "Boolean", "true", "true"),
        ]
    }

    fn show_rows(comment: &str) -> Vec<Row> {
        vec![Row::new()
            .with("format_options", "{}")
            .with("created_on", "2000-01-01 00:00:00.000 +0000")
            .with("name", "test_file_format")
            .with("database_name", "test_db")
            .with("schema_name", "test_schema")
            .with("type", "PARQUET")
            .with("owner", "SYSADMIN")
            .with("comment", comment)]
    }

    fn expect_read(conn: MockConnection, comment: &str) -> MockConnection {
        conn.expect_query(describe_sql(), describe_rows())
            .expect_query(show_sql(), show_rows(comment))
    }

    fn spec(config: Value) -> FileFormatSpec {
        FileFormatSpec::from_value(&config).unwrap()
    }

    fn minimal_config() -> Value {
        json!({
            "name": "test_file_format",
            "database": "test_db",
            "schema": "test_schema",
            "type": "parquet",
            "comment": "This is a test",
        })
    }

    #[test]
    fn test_schema_is_valid_for_minimal_config() {
        assert!(validate(&schema(), &minimal_config()).is_empty());
    }

    #[test]
    fn test_schema_rejects_unsupported_values() {
        let mut config = minimal_config();
        config["compression"] = json!("lz4");
        config["binary_format"] = json!("utf");

        let diagnostics = validate(&schema(), &config);
        let attributes: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attributes, vec!["binary_format", "compression"]);
    }

    #[test]
    fn test_identity_attributes_force_new() {
        let schema = schema();
        for name in ["name", "database", "schema", "type"] {
            assert!(schema.attribute(name).unwrap().force_new, "{}", name);
        }
        assert!(!schema.attribute("comment").unwrap().force_new);
    }

    #[test]
    fn test_spec_ignores_state_only_keys() {
        let spec = spec(json!({
            "id": ID,
            "owner": "SYSADMIN",
            "name": "test_file_format",
            "database": "test_db",
            "schema": "test_schema",
            "type": "PARQUET",
            "null_if": ["NULL", null],
        }));
        assert_eq!(spec.options.format_type, Some(FileFormatType::Parquet));
        assert_eq!(spec.options.null_if, Some(vec!["NULL".to_string(), String::new()]));
        assert_eq!(spec.id().encode().unwrap(), ID);
    }

    #[tokio::test]
    async fn test_create() {
        let mut config = minimal_config();
        schema().apply_defaults(&mut config);

        let conn = expect_read(
            MockConnection::new().expect_exec(format!(
                r#"CREATE FILE FORMAT {} TYPE = "parquet" COMMENT = "This is a test" BINARY_AS_TEXT = true TRIM_SPACE = false"#,
                QUALIFIED
            )),
            "This is a test",
        );

        let state = assert_ok!(create(&conn, &spec(config)).await);
        conn.assert_done();

        assert_eq!(state["id"], json!(ID));
        assert_eq!(state["comment"], json!("This is a test"));
        assert_eq!(state["owner"], json!("SYSADMIN"));
        assert_eq!(state["type"], json!("parquet"));
        assert_eq!(state["compression"], json!("auto"));
        assert_eq!(state["null_if"], json!(["\\N", "NULL", ""]));
    }

    #[tokio::test]
    async fn test_create_failure_skips_read() {
        let conn = MockConnection::new().expect_exec_error(
            format!(r#"CREATE FILE FORMAT {} TYPE = "parquet" COMMENT = "This is a test""#, QUALIFIED),
            "Object already exists",
        );

        let err = assert_err!(create(&conn, &spec(minimal_config())).await);
        assert_eq!(
            err.to_string(),
            "error creating file format test_file_format: Object already exists"
        );
        assert_eq!(conn.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_read() {
        let conn = expect_read(MockConnection::new(), "This is a test");

        let state = assert_ok!(read(&conn, ID).await);
        conn.assert_done();

        assert_eq!(state["name"], json!("test_file_format"));
        assert_eq!(state["database"], json!("test_db"));
        assert_eq!(state["schema"], json!("test_schema"));
        assert_eq!(state["created_on"], json!("2000-01-01 00:00:00.000 +0000"));
        assert_eq!(state["binary_as_text"], json!(true));
        assert_eq!(state["trim_space"], json!(false));
        assert_eq!(state["skip_header"], json!(0));
        assert_eq!(state["binary_format"], Value::Null);
        assert_eq!(state["record_delimiter"], json!(""));
    }

    #[tokio::test]
    async fn test_read_malformed_id() {
        let conn = MockConnection::new();
        let err = assert_err!(read(&conn, "test_db|test_file_format").await);
        assert!(matches!(err, ProviderError::InvalidId(_)));
        assert!(conn.executed().is_empty());
    }

    #[tokio::test]
    async fn test_read_bad_describe_value_aborts() {
        let conn = MockConnection::new().expect_query(
            describe_sql(),
            vec![Row::new()
                .with("property", "SKIP_HEADER")
                .with("property_type", "Integer")
                .with("property_value", "one")
                .with("property_default", "0")],
        );

        let err = assert_err!(read(&conn, ID).await);
        assert!(matches!(err, ProviderError::Decode(_)));
        assert_eq!(conn.executed(), vec![describe_sql()]);
    }

    #[tokio::test]
    async fn test_read_describe_failure_skips_show() {
        let conn = MockConnection::new().expect_query_error(
            describe_sql(),
            "File format 'TEST_FILE_FORMAT' does not exist or not authorized.",
        );

        let err = assert_err!(read(&conn, ID).await);
        assert_eq!(err.message(), format!("error describing file format {}", ID));
        assert!(matches!(
            err,
            ProviderError::Database { source: DbError::Statement(_), .. }
        ));
        assert_eq!(conn.executed(), vec![describe_sql()]);
        conn.assert_done();
    }

    #[tokio::test]
    async fn test_read_show_failure_is_wrapped() {
        let conn = MockConnection::new()
            .expect_query(describe_sql(), describe_rows())
            .expect_query_error(show_sql(), "Database 'TEST_DB' does not exist");

        let err = assert_err!(read(&conn, ID).await);
        assert_eq!(
            err.to_string(),
            format!("error showing file format {}: Database 'TEST_DB' does not exist", ID)
        );
        assert_eq!(conn.executed(), vec![describe_sql(), show_sql()]);
    }

    #[tokio::test]
    async fn test_read_missing_object_is_an_error() {
        let conn = MockConnection::new()
            .expect_query(describe_sql(), describe_rows())
            .expect_query(show_sql(), vec![]);

        let err = assert_err!(read(&conn, ID).await);
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_update_only_comment() {
        let prior = expect_read(MockConnection::new(), "This is a test");
        let prior_state = assert_ok!(read(&prior, ID).await);

        let mut planned_state = prior_state.clone();
        planned_state["comment"] = json!("Updated");

        let conn = expect_read(
            MockConnection::new().expect_exec(format!(
                r#"ALTER FILE FORMAT {} SET COMMENT = "Updated""#,
                QUALIFIED
            )),
            "Updated",
        );

        let state = assert_ok!(
            update(
                &conn,
                ID,
                &spec(prior_state).options,
                &spec(planned_state).options
            )
            .await
        );
        conn.assert_done();
        assert_eq!(state["comment"], json!("Updated"));
    }

    #[tokio::test]
    async fn test_update_applies_in_declaration_order() {
        let prior = FileFormatOptions::default();
        let planned = FileFormatOptions {
            skip_header: Some(1),
            compression: Some(Compression::Gzip),
            comment: Some("c".to_string()),
            ..Default::default()
        };

        let conn = expect_read(
            MockConnection::new()
                .expect_exec(format!(r#"ALTER FILE FORMAT {} SET COMMENT = "c""#, QUALIFIED))
                .expect_exec(format!(
                    r#"ALTER FILE FORMAT {} SET COMPRESSION = "gzip""#,
                    QUALIFIED
                ))
                .expect_exec(format!(r#"ALTER FILE FORMAT {} SET SKIP_HEADER = 1"#, QUALIFIED)),
            "c",
        );

        assert_ok!(update(&conn, ID, &prior, &planned).await);
        conn.assert_done();
    }

    #[tokio::test]
    async fn test_update_partial_failure() {
        let prior = FileFormatOptions::default();
        let planned = FileFormatOptions {
            comment: Some("c".to_string()),
            compression: Some(Compression::Gzip),
            skip_header: Some(1),
            ..Default::default()
        };

        let conn = MockConnection::new()
            .expect_exec(format!(r#"ALTER FILE FORMAT {} SET COMMENT = "c""#, QUALIFIED))
            .expect_exec_error(
                format!(r#"ALTER FILE FORMAT {} SET COMPRESSION = "gzip""#, QUALIFIED),
                "insufficient privileges",
            );

        let err = assert_err!(update(&conn, ID, &prior, &planned).await);
        conn.assert_done();
        assert_eq!(err.committed(), ["comment".to_string()]);
        assert!(err
            .to_string()
            .ends_with("error updating file format compression on test_db|test_schema|test_file_format: insufficient privileges"));
    }

    #[tokio::test]
    async fn test_update_first_failure_is_plain_error() {
        let prior = FileFormatOptions::default();
        let planned = FileFormatOptions {
            trim_space: Some(true),
            ..Default::default()
        };

        let conn = MockConnection::new().expect_exec_error(
            format!(r#"ALTER FILE FORMAT {} SET TRIM_SPACE = true"#, QUALIFIED),
            "denied",
        );

        let err = assert_err!(update(&conn, ID, &prior, &planned).await);
        assert!(matches!(err, ProviderError::Database { .. }));
    }

    #[tokio::test]
    async fn test_update_clears_comment() {
        let prior = FileFormatOptions {
            comment: Some("old".to_string()),
            ..Default::default()
        };
        let planned = FileFormatOptions::default();

        let conn = expect_read(
            MockConnection::new()
                .expect_exec(format!(r#"ALTER FILE FORMAT {} SET COMMENT = """#, QUALIFIED)),
            "",
        );

        assert_ok!(update(&conn, ID, &prior, &planned).await);
        conn.assert_done();
    }

    #[tokio::test]
    async fn test_delete() {
        let conn =
            MockConnection::new().expect_exec(format!("DROP FILE FORMAT {}", QUALIFIED));

        assert_ok!(delete(&conn, ID).await);
        conn.assert_done();
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let conn = MockConnection::new()
            .expect_exec_error(format!("DROP FILE FORMAT {}", QUALIFIED), "does not exist");

        let err = assert_err!(delete(&conn, ID).await);
        assert_eq!(
            err.to_string(),
            "error deleting file format test_db|test_schema|test_file_format: does not exist"
        );
    }

    #[tokio::test]
    async fn test_import_keeps_id() {
        let conn = expect_read(MockConnection::new(), "This is a test");

        let state = assert_ok!(import(&conn, ID).await);
        assert_eq!(state["id"], json!(ID));
        assert_eq!(state["comment"], json!("This is a test"));
    }

    #[test]
    fn test_plan_create_applies_defaults_and_normalizes() {
        let mut config = minimal_config();
        config["compression"] = json!("GZIP");
        config["binary_format"] = json!("hex");

        let plan = plan(None, &config).unwrap();
        assert!(!plan.requires_replace);
        assert_eq!(plan.planned_state["compression"], json!("gzip"));
        assert_eq!(plan.planned_state["binary_format"], json!("HEX"));
        assert_eq!(plan.planned_state["binary_as_text"], json!(true));
        assert_eq!(plan.planned_state["trim_space"], json!(false));
        assert!(plan.planned_state.get("id").is_none());
    }

    #[tokio::test]
    async fn test_plan_after_read_has_no_changes() {
        let conn = expect_read(MockConnection::new(), "This is a test");
        let state = assert_ok!(read(&conn, ID).await);

        let plan = plan(Some(&state), &minimal_config()).unwrap();
        assert!(!plan.has_changes(), "{:?}", plan.changed_paths());
        assert_eq!(plan.planned_state["owner"], json!("SYSADMIN"));
    }

    #[tokio::test]
    async fn test_csv_without_parquet_options_converges() {
        let row = |property: &str, kind: &str, value: &str| {
            Row::new()
                .with("property", property)
                .with("property_type", kind)
                .with("property_value", value)
                .with("property_default", value)
        };
        let conn = MockConnection::new()
            .expect_query(
                describe_sql(),
                vec![
                    row("TYPE", "String", "CSV"),
                    row("TRIM_SPACE", "Boolean", "false"),
                    row("COMPRESSION", "String", "AUTO"),
                ],
            )
            .expect_query(show_sql(), show_rows(""));
        let state = assert_ok!(read(&conn, ID).await);
        assert_eq!(state["binary_as_text"], json!(false));

        let config = json!({
            "name": "test_file_format",
            "database": "test_db",
            "schema": "test_schema",
            "type": "csv",
        });
        let plan = plan(Some(&state), &config).unwrap();
        assert!(!plan.has_changes(), "{:?}", plan.changed_paths());
        assert_eq!(plan.planned_state["binary_as_text"], json!(false));

        let prior = spec(state.clone());
        let planned = spec(plan.planned_state);
        let conn = MockConnection::new()
            .expect_query(describe_sql(), describe_rows())
            .expect_query(show_sql(), show_rows(""));
        assert_ok!(update(&conn, ID, &prior.options, &planned.options).await);
        assert_eq!(conn.executed(), vec![describe_sql(), show_sql()]);
    }

    #[tokio::test]
    async fn test_plan_type_change_replaces() {
        let conn = expect_read(MockConnection::new(), "This is a test");
        let state = assert_ok!(read(&conn, ID).await);

        let mut config = minimal_config();
        config["type"] = json!("csv");

        let plan = plan(Some(&state), &config).unwrap();
        assert!(plan.requires_replace);
        assert_eq!(plan.changed_paths(), vec!["type"]);
    }
}
