use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, SqlGateError};
use crate::schema::SchemaBuilder;
use crate::traits::{
    DatabaseDriver, DefaultGrammar, DefaultProcessor, EventDispatcher, Grammar, Processor,
    QueryExecuted,
};
use crate::types::{render_bindings, Binding, FetchMode, QueryLogEntry, Row};

/// Boxed future used by the callback-taking connection methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Whether statements reach the driver or are only captured.
///
/// The mode is read once per statement by the execution pipeline and handed
/// to the statement body, so every call path observes dry-run uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Statements are executed against the driver.
    Live,
    /// Statements are timed and logged but never sent to the driver.
    DryRun,
}

/// Statement body invoked by the execution pipeline. Receives the connection,
/// the query text, the normalized bindings, and the execution mode.
type StatementRunner<T> =
    for<'c> fn(&'c Connection, &'c str, &'c [Binding], ExecutionMode) -> BoxFuture<'c, Result<T>>;

/// A single-handle façade over a database driver.
///
/// Executes SQL through one pipeline that times and logs every successful
/// statement, normalizes parameter bindings before they reach the driver,
/// wraps transactions around the driver's begin/commit/rollback primitives,
/// and supports a dry-run mode that captures statements without executing
/// them.
///
/// A connection owns its driver handle for the duration of its life but
/// never opens or closes it. Mutating operations take `&mut self`; the query
/// log and execution mode are unsynchronized, so a connection belongs to one
/// owner at a time (typically one per task, handed out by an external pool).
pub struct Connection {
    driver: Arc<dyn DatabaseDriver>,
    database: String,
    table_prefix: String,
    config: HashMap<String, Value>,
    fetch_mode: FetchMode,
    query_log: Vec<QueryLogEntry>,
    mode: ExecutionMode,
    query_grammar: Box<dyn Grammar>,
    schema_grammar: Option<Box<dyn Grammar>>,
    post_processor: Box<dyn Processor>,
    events: Option<Arc<dyn EventDispatcher>>,
}

impl Connection {
    /// Create a connection around an already-open driver handle, with the
    /// default grammar and processor strategies.
    pub fn new(
        driver: Arc<dyn DatabaseDriver>,
        database: impl Into<String>,
        table_prefix: impl Into<String>,
        config: HashMap<String, Value>,
    ) -> Self {
        Self::with_strategies(
            driver,
            database,
            table_prefix,
            config,
            Box::new(DefaultGrammar::new()),
            Box::new(DefaultProcessor),
        )
    }

    /// Create a connection with explicit grammar and processor strategies.
    pub fn with_strategies(
        driver: Arc<dyn DatabaseDriver>,
        database: impl Into<String>,
        table_prefix: impl Into<String>,
        config: HashMap<String, Value>,
        mut query_grammar: Box<dyn Grammar>,
        post_processor: Box<dyn Processor>,
    ) -> Self {
        let table_prefix = table_prefix.into();
        query_grammar.set_table_prefix(table_prefix.clone());
        Self {
            driver,
            database: database.into(),
            table_prefix,
            config,
            fetch_mode: FetchMode::default(),
            query_log: Vec::new(),
            mode: ExecutionMode::Live,
            query_grammar,
            schema_grammar: None,
            post_processor,
            events: None,
        }
    }

    // ---- statement methods ----------------------------------------------

    /// Run a select statement and return the matching rows, shaped by the
    /// current fetch mode and post-processed by the active processor.
    /// Returns an empty vec in dry-run mode.
    pub async fn select(&mut self, query: &str, bindings: &[Binding]) -> Result<Vec<Row>> {
        fn runner<'c>(
            conn: &'c Connection,
            query: &'c str,
            bindings: &'c [Binding],
            mode: ExecutionMode,
        ) -> BoxFuture<'c, Result<Vec<Row>>> {
            Box::pin(async move {
                if mode == ExecutionMode::DryRun {
                    return Ok(Vec::new());
                }
                let raw = conn.driver.query(query, bindings).await?;
                let rows = Row::from_raw(raw, conn.fetch_mode);
                Ok(conn.post_processor.process_select(rows))
            })
        }
        self.run(query, bindings.to_vec(), runner).await
    }

    /// Run a select statement and return the first row, if any.
    pub async fn select_one(&mut self, query: &str, bindings: &[Binding]) -> Result<Option<Row>> {
        let rows = self.select(query, bindings).await?;
        Ok(rows.into_iter().next())
    }

    /// Execute a statement and report success. Returns `true` in dry-run
    /// mode without touching the driver.
    pub async fn statement(&mut self, query: &str, bindings: &[Binding]) -> Result<bool> {
        fn runner<'c>(
            conn: &'c Connection,
            query: &'c str,
            bindings: &'c [Binding],
            mode: ExecutionMode,
        ) -> BoxFuture<'c, Result<bool>> {
            Box::pin(async move {
                if mode == ExecutionMode::DryRun {
                    return Ok(true);
                }
                conn.driver.execute(query, bindings).await?;
                Ok(true)
            })
        }
        self.run(query, bindings.to_vec(), runner).await
    }

    /// Execute an insert statement.
    pub async fn insert(&mut self, query: &str, bindings: &[Binding]) -> Result<bool> {
        self.statement(query, bindings).await
    }

    /// Execute an update statement and return the affected-row count.
    /// Returns `0` in dry-run mode.
    pub async fn update(&mut self, query: &str, bindings: &[Binding]) -> Result<u64> {
        self.affecting_statement(query, bindings).await
    }

    /// Execute a delete statement and return the affected-row count.
    /// Returns `0` in dry-run mode.
    pub async fn delete(&mut self, query: &str, bindings: &[Binding]) -> Result<u64> {
        self.affecting_statement(query, bindings).await
    }

    async fn affecting_statement(&mut self, query: &str, bindings: &[Binding]) -> Result<u64> {
        fn runner<'c>(
            conn: &'c Connection,
            query: &'c str,
            bindings: &'c [Binding],
            mode: ExecutionMode,
        ) -> BoxFuture<'c, Result<u64>> {
            Box::pin(async move {
                if mode == ExecutionMode::DryRun {
                    return Ok(0);
                }
                conn.driver.execute(query, bindings).await
            })
        }
        self.run(query, bindings.to_vec(), runner).await
    }

    /// Execute raw SQL with no parameter binding; reports whether the
    /// statement had a nonzero effect. Returns `true` in dry-run mode.
    pub async fn unprepared(&mut self, query: &str) -> Result<bool> {
        fn runner<'c>(
            conn: &'c Connection,
            query: &'c str,
            _bindings: &'c [Binding],
            mode: ExecutionMode,
        ) -> BoxFuture<'c, Result<bool>> {
            Box::pin(async move {
                if mode == ExecutionMode::DryRun {
                    return Ok(true);
                }
                let affected = conn.driver.execute_raw(query).await?;
                Ok(affected != 0)
            })
        }
        self.run(query, Vec::new(), runner).await
    }

    // ---- execution pipeline ---------------------------------------------

    /// The single choke point every statement method goes through: normalize
    /// bindings, time the body, and on success log exactly one entry and
    /// notify the event sink. Failures are wrapped with execution context
    /// and are not logged.
    async fn run<T>(
        &mut self,
        query: &str,
        bindings: Vec<Binding>,
        f: StatementRunner<T>,
    ) -> Result<T> {
        let bindings = self.prepare_bindings(bindings);
        let mode = self.mode;
        let start = Instant::now();

        let result = f(self, query, &bindings, mode).await;

        match result {
            Ok(value) => {
                let time = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
                self.log_query(query.to_string(), bindings, time);
                Ok(value)
            }
            Err(source) => Err(SqlGateError::QueryFailed {
                sql: query.to_string(),
                bindings: render_bindings(&bindings),
                source: Box::new(source),
            }),
        }
    }

    fn log_query(&mut self, query: String, bindings: Vec<Binding>, time: String) {
        debug!(query = %query, time_ms = %time, "query executed");
        if let Some(events) = &self.events {
            events.dispatch(QueryExecuted {
                sql: query.clone(),
                bindings: bindings.clone(),
                time: time.clone(),
            });
        }
        self.query_log.push(QueryLogEntry {
            query,
            bindings,
            time,
        });
    }

    /// Coerce bindings into driver-safe primitives: date/time values become
    /// text in the query grammar's date format, and boolean `false` becomes
    /// integer `0`. Everything else passes through unchanged, including
    /// boolean `true` — only `false` is rewritten, so callers must not rely
    /// on symmetric boolean handling. Reapplying to already-normalized
    /// bindings is a no-op.
    pub fn prepare_bindings(&self, bindings: Vec<Binding>) -> Vec<Binding> {
        bindings
            .into_iter()
            .map(|binding| match binding {
                Binding::DateTime(dt) => {
                    Binding::Text(dt.format(self.query_grammar.date_format()).to_string())
                }
                Binding::Bool(false) => Binding::Int(0),
                other => other,
            })
            .collect()
    }

    // ---- transactions ----------------------------------------------------

    /// Run `proc` inside a driver transaction. Commits on success and
    /// returns `proc`'s value; rolls back on failure and returns `proc`'s
    /// error untouched — transactional failures are the one place errors are
    /// never rewrapped.
    pub async fn transaction<T, F>(&mut self, proc: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut Connection) -> BoxFuture<'c, Result<T>>,
    {
        self.driver.begin().await?;

        match proc(self).await {
            Ok(value) => {
                self.driver.commit().await?;
                Ok(value)
            }
            Err(cause) => {
                if let Err(rollback_err) = self.driver.rollback().await {
                    error!(error = %rollback_err, "rollback failed after transaction error");
                }
                Err(cause)
            }
        }
    }

    // ---- dry-run ---------------------------------------------------------

    /// Capture the statements `proc` would execute without touching the
    /// driver. The query log is cleared on entry, every statement method
    /// called inside records its attempt with a placeholder result, and the
    /// accumulated log is returned; `proc`'s own value is discarded.
    ///
    /// Not reentrant: a nested call clears the outer capture. One dry-run
    /// capture may be active on a connection at a time.
    pub async fn pretend<F>(&mut self, proc: F) -> Result<Vec<QueryLogEntry>>
    where
        F: for<'c> FnOnce(&'c mut Connection) -> BoxFuture<'c, Result<()>>,
    {
        self.query_log.clear();
        self.mode = ExecutionMode::DryRun;

        let outcome = proc(self).await;
        self.mode = ExecutionMode::Live;
        outcome?;

        Ok(self.query_log.clone())
    }

    /// Whether the connection is currently capturing instead of executing.
    pub fn pretending(&self) -> bool {
        self.mode == ExecutionMode::DryRun
    }

    // ---- strategy & configuration accessors ------------------------------

    pub fn driver(&self) -> Arc<dyn DatabaseDriver> {
        Arc::clone(&self.driver)
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn set_database_name(&mut self, database: impl Into<String>) {
        self.database = database.into();
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Set the table prefix and push it into the current query grammar.
    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) {
        self.table_prefix = prefix.into();
        self.query_grammar.set_table_prefix(self.table_prefix.clone());
    }

    /// Push the connection's prefix into a grammar value and return it.
    /// Used when a borrowed grammar must be prefix-aware before generating
    /// SQL.
    pub fn with_table_prefix<G: Grammar>(&self, mut grammar: G) -> G {
        grammar.set_table_prefix(self.table_prefix.clone());
        grammar
    }

    pub fn get_config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Look up a configuration key that must be present.
    pub fn require_config(&self, key: &str) -> Result<&Value> {
        self.get_config(key)
            .ok_or_else(|| SqlGateError::Configuration(format!("missing configuration key: {key}")))
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    pub fn set_fetch_mode(&mut self, mode: FetchMode) {
        self.fetch_mode = mode;
    }

    pub fn query_grammar(&self) -> &dyn Grammar {
        self.query_grammar.as_ref()
    }

    pub fn set_query_grammar(&mut self, grammar: Box<dyn Grammar>) {
        self.query_grammar = grammar;
    }

    pub fn schema_grammar(&self) -> Option<&dyn Grammar> {
        self.schema_grammar.as_deref()
    }

    pub fn set_schema_grammar(&mut self, grammar: Box<dyn Grammar>) {
        self.schema_grammar = Some(grammar);
    }

    pub fn post_processor(&self) -> &dyn Processor {
        self.post_processor.as_ref()
    }

    pub fn set_post_processor(&mut self, processor: Box<dyn Processor>) {
        self.post_processor = processor;
    }

    pub fn event_dispatcher(&self) -> Option<&Arc<dyn EventDispatcher>> {
        self.events.as_ref()
    }

    pub fn set_event_dispatcher(&mut self, events: Arc<dyn EventDispatcher>) {
        self.events = Some(events);
    }

    pub fn unset_event_dispatcher(&mut self) {
        self.events = None;
    }

    /// Executed statements, oldest first.
    pub fn query_log(&self) -> &[QueryLogEntry] {
        &self.query_log
    }

    pub fn flush_query_log(&mut self) {
        self.query_log.clear();
    }

    /// Construct the schema-builder collaborator, installing a prefix-aware
    /// default schema grammar first if none is set.
    pub fn schema_builder(&mut self) -> SchemaBuilder<'_> {
        if self.schema_grammar.is_none() {
            let grammar = self.with_table_prefix(DefaultGrammar::new());
            self.schema_grammar = Some(Box::new(grammar));
        }
        SchemaBuilder::new(self)
    }
}
