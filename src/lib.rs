//! sqlgate - a connection façade over pluggable database drivers
//!
//! A [`Connection`] executes SQL through a single pipeline that times and
//! logs every successful statement, normalizes parameter bindings before
//! they reach the driver, wraps transactions with rollback-on-failure, and
//! supports a dry-run "pretend" mode that captures statements without
//! executing them. SQL generation and result shaping are delegated to
//! pluggable [`Grammar`] and [`Processor`] strategies.
//!
//! # Example
//! ```ignore
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use sqlgate::drivers::TokioPostgresDriver;
//! use sqlgate::{Binding, Connection};
//!
//! let driver = Arc::new(TokioPostgresDriver::connect("postgres://localhost/mydb").await?);
//! let mut conn = Connection::new(driver, "mydb", "", HashMap::new());
//!
//! let users = conn
//!     .select("SELECT * FROM users WHERE id = $1", &[Binding::from(1_i64)])
//!     .await?;
//!
//! conn.transaction(|conn| {
//!     Box::pin(async move {
//!         conn.insert("INSERT INTO users (name) VALUES ($1)", &[Binding::from("Ada")])
//!             .await?;
//!         conn.update("UPDATE counters SET n = n + 1 WHERE name = $1", &[Binding::from("users")])
//!             .await?;
//!         Ok(())
//!     })
//! })
//! .await?;
//! ```

pub mod drivers;
pub mod error;
pub mod schema;
pub mod traits;
pub mod types;

mod connection;

// Re-export main types for convenient access
pub use connection::{BoxFuture, Connection, ExecutionMode};
pub use error::{Result, SqlGateError};
pub use schema::SchemaBuilder;
pub use traits::{
    DatabaseDriver, DefaultGrammar, DefaultProcessor, EventDispatcher, Grammar, Processor,
    QueryExecuted,
};
pub use types::{render_bindings, Binding, FetchMode, QueryLogEntry, RawQueryResult, Row};
