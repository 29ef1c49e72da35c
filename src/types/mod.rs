mod binding;
mod query_log;
mod row;

pub use binding::{render_bindings, Binding};
pub use query_log::QueryLogEntry;
pub use row::{FetchMode, RawQueryResult, Row};
