use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Verified token payload, attached to request extensions by the gate.
///
/// The gate passes it through untouched: object payloads keep every claim,
/// anything else is kept as its raw string form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedClaims {
    Claims(Map<String, Value>),
    Raw(String),
}

impl From<Value> for DecodedClaims {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Claims(map),
            Value::String(s) => Self::Raw(s),
            other => Self::Raw(other.to_string()),
        }
    }
}

impl DecodedClaims {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Claims(map) => map.get(name),
            Self::Raw(_) => None,
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claim("sub").and_then(Value::as_str)
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(s) => Some(s),
            Self::Claims(_) => None,
        }
    }

    /// Deserialize into an application claims type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Self::Claims(map) => serde_json::from_value(Value::Object(map.clone())),
            Self::Raw(s) => serde_json::from_value(Value::String(s.clone())),
        }
    }
}
