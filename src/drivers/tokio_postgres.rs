use async_trait::async_trait;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

use crate::error::{Result, SqlGateError};
use crate::traits::DatabaseDriver;
use crate::types::{Binding, RawQueryResult};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Wraps an already-open [`Client`]; closing it is the caller's concern.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Wrap a pre-opened client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Connect to a PostgreSQL database and spawn its connection task.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| SqlGateError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self::from_client(client))
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn query(&self, sql: &str, params: &[Binding]) -> Result<RawQueryResult> {
        let converted = convert_params(params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = converted
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client
            .query(sql, &param_refs)
            .await
            .map_err(SqlGateError::driver)?;

        // Extract column names
        let columns: Vec<String> = if rows.is_empty() {
            Vec::new()
        } else {
            rows[0]
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        };

        // Convert rows to string values
        let result_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                (0..row.len())
                    .map(|i| row_value_to_string(row, i))
                    .collect()
            })
            .collect();

        Ok(RawQueryResult::new(columns, result_rows))
    }

    async fn execute(&self, sql: &str, params: &[Binding]) -> Result<u64> {
        let converted = convert_params(params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = converted
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        self.client
            .execute(sql, &param_refs)
            .await
            .map_err(SqlGateError::driver)
    }

    async fn execute_raw(&self, sql: &str) -> Result<u64> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(SqlGateError::driver)?;

        let mut affected = 0;
        for message in messages {
            if let SimpleQueryMessage::CommandComplete(count) = message {
                affected += count;
            }
        }
        Ok(affected)
    }

    async fn begin(&self) -> Result<()> {
        self.client
            .batch_execute("BEGIN")
            .await
            .map_err(SqlGateError::driver)
    }

    async fn commit(&self) -> Result<()> {
        self.client
            .batch_execute("COMMIT")
            .await
            .map_err(SqlGateError::driver)
    }

    async fn rollback(&self) -> Result<()> {
        self.client
            .batch_execute("ROLLBACK")
            .await
            .map_err(SqlGateError::driver)
    }
}

/// Convert bindings to boxed ToSql trait objects.
fn convert_params(params: &[Binding]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    params.iter().map(binding_to_tosql).collect()
}

fn binding_to_tosql(value: &Binding) -> Box<dyn ToSql + Sync + Send> {
    match value {
        Binding::Null => Box::new(None::<String>),
        Binding::Bool(b) => Box::new(*b),
        Binding::Int(i) => Box::new(*i),
        Binding::Float(f) => Box::new(*f),
        Binding::Text(s) => Box::new(s.clone()),
        Binding::DateTime(dt) => Box::new(*dt),
        Binding::Raw(expr) => Box::new(expr.clone()),
    }
}

/// Convert a row value at a given index to a string.
fn row_value_to_string(row: &tokio_postgres::Row, index: usize) -> String {
    // Try common types and convert to string

    // Try as i32
    if let Ok(val) = row.try_get::<_, i32>(index) {
        return val.to_string();
    }

    // Try as i64
    if let Ok(val) = row.try_get::<_, i64>(index) {
        return val.to_string();
    }

    // Try as String
    if let Ok(val) = row.try_get::<_, String>(index) {
        return val;
    }

    // Try as bool
    if let Ok(val) = row.try_get::<_, bool>(index) {
        return val.to_string();
    }

    // Try as f64
    if let Ok(val) = row.try_get::<_, f64>(index) {
        return val.to_string();
    }

    // Try as timestamp
    if let Ok(val) = row.try_get::<_, chrono::NaiveDateTime>(index) {
        return val.to_string();
    }

    // Try as Option<String> for NULL handling
    if let Ok(val) = row.try_get::<_, Option<String>>(index) {
        return val.unwrap_or_else(|| "NULL".to_string());
    }

    // Fallback
    "UNKNOWN".to_string()
}
