use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("Asset file not found: {path}")]
    MissingFile { path: String },
    #[error("Index {index} out of range for {path} ({len} records)")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
    #[error("Invalid object path: {0:?}")]
    InvalidObjectPath(String),
    #[error("Unexpected data table layout: {0}")]
    InvalidDataTable(String),
    #[error("Row {key} is missing field `{field}`")]
    MissingField { key: String, field: &'static str },
    #[error("Malformed row {key}: {detail}")]
    MalformedRow { key: String, detail: String },
    #[error("No row {key:?} in the {table} table")]
    MissingRow { table: &'static str, key: String },
    #[error("No {namespace} entries found in any localization")]
    EmptyNamespace { namespace: &'static str },
    #[error("Error serializing or deserializing json: {err}")]
    SerdeJson {
        #[from]
        err: serde_json::Error,
    },
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Failed to process row {key}: {source}")]
    Row {
        key: String,
        #[source]
        source: Box<ErrorKind>,
    },
}

impl ErrorKind {
    /// Attach the key of the row being processed.
    pub fn in_row(self, key: &str) -> ErrorKind {
        ErrorKind::Row {
            key: key.to_string(),
            source: Box::new(self),
        }
    }
}

pub type IResult<T> = Result<T, ErrorKind>;
