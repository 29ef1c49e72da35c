use thiserror::Error;

/// Error type for sqlgate operations
#[derive(Debug, Error)]
pub enum SqlGateError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A statement failed inside the execution pipeline. Carries the SQL
    /// text and a rendering of the normalized bindings; the original failure
    /// stays reachable through `source()`.
    #[error("{source} (SQL: {sql}) (Bindings: [{bindings}])")]
    QueryFailed {
        sql: String,
        bindings: String,
        #[source]
        source: Box<SqlGateError>,
    },

    /// A native driver error, kind preserved for callers that branch on it.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

impl SqlGateError {
    /// Wrap a native driver error without losing its concrete type.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SqlGateError::Driver(Box::new(err))
    }
}

/// Result type alias for sqlgate operations
pub type Result<T> = std::result::Result<T, SqlGateError>;
