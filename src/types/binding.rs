use std::fmt;

use chrono::NaiveDateTime;

/// Represents a SQL parameter value in a driver-agnostic way.
/// Drivers are responsible for converting these to their native types.
///
/// Date/time and boolean `false` values are rewritten to driver primitives
/// by [`Connection::prepare_bindings`](crate::Connection::prepare_bindings)
/// before they reach a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    /// A raw SQL expression, passed through normalization untouched.
    Raw(String),
}

impl From<&str> for Binding {
    fn from(value: &str) -> Self {
        Binding::Text(value.to_string())
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::Text(value)
    }
}

impl From<i32> for Binding {
    fn from(value: i32) -> Self {
        Binding::Int(value.into())
    }
}

impl From<i64> for Binding {
    fn from(value: i64) -> Self {
        Binding::Int(value)
    }
}

impl From<f64> for Binding {
    fn from(value: f64) -> Self {
        Binding::Float(value)
    }
}

impl From<bool> for Binding {
    fn from(value: bool) -> Self {
        Binding::Bool(value)
    }
}

impl From<NaiveDateTime> for Binding {
    fn from(value: NaiveDateTime) -> Self {
        Binding::DateTime(value)
    }
}

impl<T: Into<Binding>> From<Option<T>> for Binding {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Binding::Null,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Null => write!(f, "null"),
            Binding::Bool(b) => write!(f, "{}", b),
            Binding::Int(i) => write!(f, "{}", i),
            Binding::Float(v) => write!(f, "{}", v),
            Binding::Text(s) => write!(f, "'{}'", s),
            Binding::DateTime(dt) => write!(f, "'{}'", dt),
            Binding::Raw(expr) => write!(f, "{}", expr),
        }
    }
}

/// Render a bindings sequence for error messages and diagnostics.
pub fn render_bindings(bindings: &[Binding]) -> String {
    bindings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
