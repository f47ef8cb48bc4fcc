use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ErrorKind;

/// An exported `DataTable`: a JSON array whose first element carries a `Rows`
/// object mapping row keys to row records.
///
/// Rows keep the order they were written in.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    rows: Map<String, Value>,
}

impl DataTable {
    pub fn from_slice(data: &[u8]) -> Result<DataTable, ErrorKind> {
        let value: Value = serde_json::from_slice(data)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<DataTable, ErrorKind> {
        let Value::Array(exports) = value else {
            return Err(ErrorKind::InvalidDataTable(
                "root is not an array".to_string(),
            ));
        };

        let rows = exports
            .into_iter()
            .next()
            .and_then(|export| match export {
                Value::Object(mut export) => export.remove("Rows"),
                _ => None,
            })
            .ok_or_else(|| {
                ErrorKind::InvalidDataTable("first export has no `Rows` object".to_string())
            })?;

        match rows {
            Value::Object(rows) => Ok(DataTable { rows }),
            _ => Err(ErrorKind::InvalidDataTable(
                "`Rows` is not an object".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Raw rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.rows.iter().map(|(key, row)| (key.as_str(), row))
    }

    /// Decode the row stored under `key`, if there is one.
    pub fn row<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ErrorKind> {
        self.rows
            .get(key)
            .map(|row| decode_row(key, row))
            .transpose()
    }

    /// Decode every row in table order.
    pub fn decode_all<T: DeserializeOwned>(&self) -> Result<Vec<(String, T)>, ErrorKind> {
        self.rows()
            .map(|(key, row)| Ok((key.to_string(), decode_row(key, row)?)))
            .collect()
    }
}

/// Decode one raw row, naming the row in the error when its shape is wrong.
pub fn decode_row<T: DeserializeOwned>(key: &str, row: &Value) -> Result<T, ErrorKind> {
    T::deserialize(row).map_err(|err| ErrorKind::MalformedRow {
        key: key.to_string(),
        detail: err.to_string(),
    })
}
