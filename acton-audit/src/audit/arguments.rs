//! Named call arguments captured for an audited invocation

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Debug;

use super::serializer::snapshot;

/// Name → value map of an operation's arguments
///
/// Values are captured as JSON trees when the invocation starts, so later
/// mutation by the operation does not change what the audit trail sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named argument
    pub fn with<T>(mut self, name: impl Into<String>, value: &T) -> Self
    where
        T: Serialize + Debug + ?Sized,
    {
        self.insert(name, value);
        self
    }

    /// Add a named argument in place
    pub fn insert<T>(&mut self, name: impl Into<String>, value: &T)
    where
        T: Serialize + Debug + ?Sized,
    {
        self.0.insert(name.into(), snapshot(value));
    }

    /// Derive arguments from a serializable value
    ///
    /// Struct fields (or map entries) become the argument names. Anything that
    /// does not serialize to an object is bound as a single argument `arg0`.
    pub fn from_serialize<T>(value: &T) -> Self
    where
        T: Serialize + Debug + ?Sized,
    {
        match snapshot(value) {
            Value::Object(map) => Self(map),
            Value::Null => Self::default(),
            other => {
                let mut map = Map::new();
                map.insert("arg0".to_string(), other);
                Self(map)
            }
        }
    }

    /// Look up an argument by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no arguments were captured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over argument names and values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize)]
    struct CreateUser {
        id: Option<u64>,
        name: String,
    }

    #[test]
    fn test_with_captures_values() {
        let args = Arguments::new().with("id", &7).with("tags", &["a", "b"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("id"), Some(&json!(7)));
        assert_eq!(args.get("tags"), Some(&json!(["a", "b"])));
        assert!(args.get("missing").is_none());
    }

    #[test]
    fn test_from_struct_uses_field_names() {
        let args = Arguments::from_serialize(&CreateUser {
            id: None,
            name: "ada".to_string(),
        });
        assert_eq!(args.get("id"), Some(&Value::Null));
        assert_eq!(args.get("name"), Some(&json!("ada")));
    }

    #[test]
    fn test_from_scalar_binds_arg0() {
        let args = Arguments::from_serialize(&42);
        assert_eq!(args.get("arg0"), Some(&json!(42)));

        assert!(Arguments::from_serialize(&()).is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let args = Arguments::new().with("id", &7);
        assert_eq!(serde_json::to_string(&args).unwrap(), r#"{"id":7}"#);
    }
}
