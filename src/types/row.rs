use std::collections::HashMap;

use crate::error::{Result, SqlGateError};

/// Driver-agnostic raw result from a database statement.
/// All values are converted to strings by the driver.
#[derive(Debug, Clone)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of string values in column order
    pub rows: Vec<Vec<String>>,
    /// Number of rows returned or affected by the statement
    pub rows_affected: u64,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows_affected = rows.len() as u64;
        Self {
            columns,
            rows,
            rows_affected,
        }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: 0,
        }
    }

    /// A row-less result for statements that only report an affected count.
    pub fn affected(count: u64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: count,
        }
    }
}

/// The shape in which result rows are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Rows keyed by column name.
    #[default]
    Assoc,
    /// Rows as positional values in column order.
    Numeric,
}

/// A single row result from a query, shaped per the active [`FetchMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Assoc(HashMap<String, String>),
    Numeric(Vec<String>),
}

impl Row {
    fn new(columns: &[String], values: Vec<String>, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Assoc => {
                let values = columns
                    .iter()
                    .zip(values.into_iter())
                    .map(|(col, val)| (col.clone(), val))
                    .collect();
                Row::Assoc(values)
            }
            FetchMode::Numeric => Row::Numeric(values),
        }
    }

    /// Materialize every row of a raw result in the given fetch mode.
    pub(crate) fn from_raw(raw: RawQueryResult, mode: FetchMode) -> Vec<Row> {
        raw.rows
            .into_iter()
            .map(|values| Row::new(&raw.columns, values, mode))
            .collect()
    }

    /// Gets a value by column name. Numeric rows carry no column names, so
    /// lookups on them always miss.
    pub fn get(&self, column: &str) -> Result<&str> {
        match self {
            Row::Assoc(values) => values
                .get(column)
                .map(|s| s.as_str())
                .ok_or_else(|| SqlGateError::ColumnNotFound(column.to_string())),
            Row::Numeric(_) => Err(SqlGateError::ColumnNotFound(column.to_string())),
        }
    }

    /// Gets a value by position. Assoc rows are unordered, so positional
    /// access is only available on numeric rows.
    pub fn index(&self, i: usize) -> Option<&str> {
        match self {
            Row::Assoc(_) => None,
            Row::Numeric(values) => values.get(i).map(|s| s.as_str()),
        }
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        match self {
            Row::Assoc(values) => values.len(),
            Row::Numeric(values) => values.len(),
        }
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawQueryResult {
        RawQueryResult::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "Bob".to_string()],
            ],
        )
    }

    #[test]
    fn test_rows_affected_tracks_row_count() {
        assert_eq!(raw().rows_affected, 2);
        assert_eq!(RawQueryResult::empty().rows_affected, 0);
        assert_eq!(RawQueryResult::affected(5).rows_affected, 5);
    }

    #[test]
    fn test_assoc_rows() {
        let rows = Row::from_raw(raw(), FetchMode::Assoc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id").unwrap(), "1");
        assert_eq!(rows[1].get("name").unwrap(), "Bob");
        assert!(rows[0].index(0).is_none());
    }

    #[test]
    fn test_numeric_rows() {
        let rows = Row::from_raw(raw(), FetchMode::Numeric);
        assert_eq!(rows[0].index(1).unwrap(), "Alice");
        assert_eq!(rows[1].index(0).unwrap(), "2");
        assert!(rows[0].get("id").is_err());
    }

    #[test]
    fn test_missing_column() {
        let rows = Row::from_raw(raw(), FetchMode::Assoc);
        let err = rows[0].get("missing").unwrap_err();
        match err {
            SqlGateError::ColumnNotFound(column) => assert_eq!(column, "missing"),
            _ => panic!("Expected ColumnNotFound error"),
        }
    }
}
