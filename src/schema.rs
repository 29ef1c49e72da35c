use crate::connection::Connection;
use crate::traits::Grammar;

/// Entry point for the schema tooling built on top of a [`Connection`].
///
/// The schema API itself lives outside this crate; this type only carries
/// the connection and its schema grammar so that layer has what it needs.
/// Obtain one via [`Connection::schema_builder`], which installs a default
/// schema grammar first if none is set.
pub struct SchemaBuilder<'c> {
    connection: &'c Connection,
}

impl<'c> SchemaBuilder<'c> {
    pub(crate) fn new(connection: &'c Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        self.connection
    }

    /// The schema grammar, falling back to the query grammar if the schema
    /// slot was somehow cleared after construction.
    pub fn grammar(&self) -> &dyn Grammar {
        self.connection
            .schema_grammar()
            .unwrap_or_else(|| self.connection.query_grammar())
    }
}
