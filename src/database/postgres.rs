use super::{ConnectionString, Database, Row, SESSION_INIT};
use crate::core::{Result, SiteError};
use crate::query::PlaceholderValue;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query as SqlxQuery;
use sqlx::{Column, Connection, PgConnection, Postgres, Row as _, TypeInfo};
use std::time::Duration;
use tracing::{debug, warn};

/// Соединение через sqlx под учётной записью посетителя
#[derive(Debug, Default)]
pub struct PgDatabase {
    connection: Option<PgConnection>,
    user: Option<String>,
}

impl PgDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn connect(&mut self, connection: &ConnectionString) -> Result<()> {
        if self.connection.is_some() {
            self.disconnect().await?;
        }

        let failure = |reason: String| SiteError::ConnectionFailure { user: connection.user.clone(), reason };
        let timeout = Duration::from_secs(connection.connect_timeout.max(1));
        let mut conn = tokio::time::timeout(timeout, PgConnection::connect(&connection.url()))
            .await
            .map_err(|_| failure("connect timeout".to_string()))?
            .map_err(|e| failure(e.to_string()))?;

        for statement in SESSION_INIT {
            sqlx::Executor::execute(&mut conn, sqlx::raw_sql(statement)).await?;
        }

        debug!(user = %connection.user, host = %connection.host, "connected");
        self.connection = Some(conn);
        self.user = Some(connection.user.clone());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.user = None;
        if let Some(conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                warn!("Error closing connection: {}", e);
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connected_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    async fn query(&mut self, sql: &str, binds: Vec<PlaceholderValue>) -> Result<Vec<Row>> {
        let conn = self.connection.as_mut().ok_or(SiteError::NoConnection)?;
        let rows = bind_values(sqlx::query(sql), binds).fetch_all(&mut *conn).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn bind_values(
    mut query: SqlxQuery<'_, Postgres, PgArguments>,
    binds: Vec<PlaceholderValue>,
) -> SqlxQuery<'_, Postgres, PgArguments> {
    for value in binds {
        query = match value {
            PlaceholderValue::Bool(b) => query.bind(b),
            PlaceholderValue::Int(i) => query.bind(i),
            PlaceholderValue::Float(f) => query.bind(f),
            PlaceholderValue::Text(s) => query.bind(s),
            PlaceholderValue::Null => query.bind(None::<String>),
        };
    }
    query
}

fn row_to_json(row: &PgRow) -> Row {
    let mut object = Row::new();
    for column in row.columns() {
        let name = column.name();
        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = match type_name.as_str() {
            "INT2" => row.try_get::<Option<i16>, _>(name).ok().flatten().map(|v| Value::from(i64::from(v))),
            "INT4" => row.try_get::<Option<i32>, _>(name).ok().flatten().map(|v| Value::from(i64::from(v))),
            "INT8" => row.try_get::<Option<i64>, _>(name).ok().flatten().map(Value::from),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(name)
                .ok()
                .flatten()
                .and_then(|v| serde_json::Number::from_f64(f64::from(v)))
                .map(Value::Number),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(name)
                .ok()
                .flatten()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            "BOOL" => row.try_get::<Option<bool>, _>(name).ok().flatten().map(Value::Bool),
            // Как `bytea_output = hex`
            "BYTEA" => row
                .try_get::<Option<Vec<u8>>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(format!("\\x{}", hex::encode(v)))),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.and_utc().to_rfc3339())),
            _ => row.try_get::<Option<String>, _>(name).ok().flatten().map(Value::String),
        }
        .unwrap_or(Value::Null);

        object.insert(name.to_string(), value);
    }
    object
}
