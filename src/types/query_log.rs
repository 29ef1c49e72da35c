use crate::types::Binding;

/// One recorded statement execution: query text, normalized bindings, and
/// elapsed milliseconds formatted to two decimal places.
///
/// Entries are appended by the execution pipeline on success only and are
/// cleared by an explicit flush or on entering pretend mode.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLogEntry {
    pub query: String,
    pub bindings: Vec<Binding>,
    pub time: String,
}
