/// Trait representing a SQL dialect strategy.
///
/// The façade only needs two capabilities from a grammar: the date-literal
/// format used when normalizing bindings, and a table prefix that the
/// (out-of-scope) query and schema builders push into generated SQL.
pub trait Grammar: Send + Sync {
    /// Format string for date/time literals, in strftime syntax.
    fn date_format(&self) -> &str {
        "%Y-%m-%d %H:%M:%S"
    }

    /// Returns the prefix prepended to table names in generated SQL.
    fn table_prefix(&self) -> &str;

    fn set_table_prefix(&mut self, prefix: String);
}

/// Grammar with the standard date format and a configurable prefix.
#[derive(Debug, Clone, Default)]
pub struct DefaultGrammar {
    table_prefix: String,
}

impl DefaultGrammar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Grammar for DefaultGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: String) {
        self.table_prefix = prefix;
    }
}
