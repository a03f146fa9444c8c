use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lenient::Scalar;

/// Opaque record identifier assigned by the backend.
///
/// The backend may send integers or strings; both are kept as their textual
/// form and rendered verbatim in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId(n.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers so JSON output matches the server's.
        match self.0.parse::<u64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Scalar::deserialize(deserializer)? {
            Scalar::Str(s) => Ok(RecordId(s)),
            Scalar::Int(n) => Ok(RecordId(n.to_string())),
            Scalar::Float(f) => Ok(RecordId(f.to_string())),
            Scalar::Bool(b) => Err(serde::de::Error::custom(format!(
                "expected a string or number id, got {b}"
            ))),
        }
    }
}
