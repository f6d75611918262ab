//! Driver-neutral result rows.

use crate::error::{Result, StoreError};

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One result row: column names paired with values, in select order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Look up a column by name. Names are matched case-insensitively.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
    }

    /// A text column that may be NULL.
    pub fn get_opt_string(&self, name: &str) -> Result<Option<String>> {
        match self.value(name)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(mismatch(name, "text", other)),
        }
    }

    /// A text column; NULL reads as the empty string.
    pub fn get_string(&self, name: &str) -> Result<String> {
        Ok(self.get_opt_string(name)?.unwrap_or_default())
    }

    pub fn get_opt_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.value(name)? {
            Value::Null => Ok(None),
            Value::Integer(v) => Ok(Some(*v)),
            other => Err(mismatch(name, "integer", other)),
        }
    }

    /// An integer column; NULL reads as zero.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        Ok(self.get_opt_i64(name)?.unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> StoreError {
    StoreError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// A statically-typed record scanned from a [`Row`].
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_columns() {
        let row = Row::new()
            .with("uid", "f1")
            .with("parent_uid", Value::Null)
            .with("org_id", 1);

        assert_eq!(row.get_string("uid").unwrap(), "f1");
        assert_eq!(row.get_string("parent_uid").unwrap(), "");
        assert_eq!(row.get_opt_string("parent_uid").unwrap(), None);
        assert_eq!(row.get_i64("org_id").unwrap(), 1);
    }

    #[test]
    fn test_column_lookup_ignores_case() {
        let row = Row::new().with("Permission", 4);
        assert_eq!(row.get_i64("permission").unwrap(), 4);
    }

    #[test]
    fn test_missing_column() {
        let err = Row::new().get_string("uid").unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn(c) if c == "uid"));
    }

    #[test]
    fn test_type_mismatch() {
        let row = Row::new().with("uid", 7);
        let err = row.get_string("uid").unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: "text", found: "integer", .. }
        ));
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
