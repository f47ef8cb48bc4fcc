use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// A reference into another exported asset file, written in the export as
/// `"<file path without extension>.<record index>"`.
///
/// e.g. `"MotorTown/Content/Cars/Models/Bongo/Bongo_Bus.3"` points at record 3 of
/// `MotorTown/Content/Cars/Models/Bongo/Bongo_Bus.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath {
    path: String,
    index: usize,
}

impl ObjectPath {
    pub fn new(path: impl Into<String>, index: usize) -> Self {
        ObjectPath {
            path: path.into(),
            index,
        }
    }

    /// File path without the `.json` extension.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Path of the JSON file this reference points into.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.path)
    }
}

impl std::str::FromStr for ObjectPath {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, index) = s
            .rsplit_once('.')
            .ok_or_else(|| ErrorKind::InvalidObjectPath(s.to_string()))?;
        if path.is_empty() {
            return Err(ErrorKind::InvalidObjectPath(s.to_string()));
        }
        let index = index
            .parse::<usize>()
            .map_err(|_| ErrorKind::InvalidObjectPath(s.to_string()))?;

        Ok(ObjectPath::new(path, index))
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = ErrorKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectPath> for String {
    fn from(value: ObjectPath) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.path, self.index)
    }
}
