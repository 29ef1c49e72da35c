use crate::types::Binding;

/// Payload fired after every successful statement execution, including
/// dry-run executions.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecuted {
    pub sql: String,
    /// Bindings as normalized by the pipeline, not as supplied by the caller.
    pub bindings: Vec<Binding>,
    /// Elapsed milliseconds, formatted to two decimal places.
    pub time: String,
}

impl QueryExecuted {
    /// Channel name these events are published under.
    pub const CHANNEL: &'static str = "query executed";
}

/// Observability sink notified of executed statements.
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: QueryExecuted);
}
