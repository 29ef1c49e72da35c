use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, SqlGateError};
use crate::traits::DatabaseDriver;
use crate::types::{Binding, RawQueryResult};

/// The kind of driver call that was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCallKind {
    Query,
    Execute,
    ExecuteRaw,
    Begin,
    Commit,
    Rollback,
}

/// A recorded driver call for verification. Transaction primitives carry no
/// SQL or parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverCall {
    pub kind: DriverCallKind,
    pub sql: String,
    pub params: Vec<Binding>,
}

/// Error injected by [`InMemoryTestDriver::with_failure`].
#[derive(Debug)]
pub struct InjectedFailure(pub String);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InjectedFailure {}

/// An in-memory database driver for testing.
///
/// Records every driver call in order — queries, executes, and transaction
/// primitives — and returns configured responses.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sqlgate::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new().with_response(
///         InMemoryTestResponseBuilder::new()
///             .columns(&["id", "name"])
///             .row(&["1", "Alice"])
///             .build(),
///     ),
/// );
/// ```
pub struct InMemoryTestDriver {
    responses: Mutex<VecDeque<RawQueryResult>>,
    affected: Mutex<VecDeque<u64>>,
    recorded_calls: Mutex<Vec<DriverCall>>,
    default_response: RawQueryResult,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no pre-configured responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            affected: Mutex::new(VecDeque::new()),
            recorded_calls: Mutex::new(Vec::new()),
            default_response: RawQueryResult::empty(),
            fail_next: Mutex::new(None),
        }
    }

    /// Add a response to be returned by the next query.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Add multiple responses to be returned by subsequent queries.
    pub fn with_responses(self, responses: impl IntoIterator<Item = RawQueryResult>) -> Self {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
        drop(queue);
        self
    }

    /// Set a default response to use when no queued responses remain.
    pub fn with_default_response(mut self, response: RawQueryResult) -> Self {
        self.default_response = response;
        self
    }

    /// Queue an affected-row count for the next execute call.
    pub fn with_affected(self, count: u64) -> Self {
        self.affected.lock().unwrap().push_back(count);
        self
    }

    /// Fail the next statement call (query, execute, or raw) with the given
    /// message.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.fail_next.lock().unwrap() = Some(message.into());
        self
    }

    /// Get all recorded driver calls, in order.
    pub fn recorded_calls(&self) -> Vec<DriverCall> {
        self.recorded_calls.lock().unwrap().clone()
    }

    /// Get the recorded statement calls only (queries, executes, raw),
    /// skipping transaction primitives.
    pub fn statement_calls(&self) -> Vec<DriverCall> {
        self.recorded_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| {
                matches!(
                    call.kind,
                    DriverCallKind::Query | DriverCallKind::Execute | DriverCallKind::ExecuteRaw
                )
            })
            .cloned()
            .collect()
    }

    /// Get the last recorded statement call, if any.
    pub fn last_query(&self) -> Option<DriverCall> {
        self.statement_calls().last().cloned()
    }

    /// Clear all recorded calls.
    pub fn clear_recorded_calls(&self) {
        self.recorded_calls.lock().unwrap().clear();
    }

    /// Assert that the last statement call matches the expected SQL and
    /// parameters.
    pub fn assert_last_query(&self, expected_sql: &str, expected_params: &[Binding]) {
        let last = self.last_query().expect("No statement calls were recorded");
        assert_eq!(
            last.sql, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last.sql
        );
        assert_eq!(
            last.params, expected_params,
            "Parameters mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_params, last.params
        );
    }

    /// Assert that exactly n statement calls were executed.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = self.statement_calls().len();
        assert_eq!(
            actual, expected,
            "Statement call count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }

    /// Assert the exact ordered sequence of recorded call kinds.
    pub fn assert_call_kinds(&self, expected: &[DriverCallKind]) {
        let actual: Vec<DriverCallKind> = self
            .recorded_calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.kind)
            .collect();
        assert_eq!(
            actual, expected,
            "Driver call sequence mismatch.\nExpected: {:?}\nActual: {:?}",
            expected, actual
        );
    }

    fn record(&self, kind: DriverCallKind, sql: &str, params: &[Binding]) {
        self.recorded_calls.lock().unwrap().push(DriverCall {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }

    fn take_failure(&self) -> Option<SqlGateError> {
        self.fail_next
            .lock()
            .unwrap()
            .take()
            .map(|message| SqlGateError::driver(InjectedFailure(message)))
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn query(&self, sql: &str, params: &[Binding]) -> Result<RawQueryResult> {
        self.record(DriverCallKind::Query, sql, params);
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());

        Ok(response)
    }

    async fn execute(&self, sql: &str, params: &[Binding]) -> Result<u64> {
        self.record(DriverCallKind::Execute, sql, params);
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }

        Ok(self.affected.lock().unwrap().pop_front().unwrap_or(0))
    }

    async fn execute_raw(&self, sql: &str) -> Result<u64> {
        self.record(DriverCallKind::ExecuteRaw, sql, &[]);
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }

        Ok(self.affected.lock().unwrap().pop_front().unwrap_or(0))
    }

    async fn begin(&self) -> Result<()> {
        self.record(DriverCallKind::Begin, "", &[]);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.record(DriverCallKind::Commit, "", &[]);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.record(DriverCallKind::Rollback, "", &[]);
        Ok(())
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of string values.
    pub fn row(mut self, values: &[&str]) -> Self {
        self.rows
            .push(values.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
