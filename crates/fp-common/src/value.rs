//! Attribute values returned by the system query layer.

use serde::{Serialize, Serializer};

/// Raw result of a single attribute query.
///
/// `Absent` is an ordinary value: a probe that fails for any environmental
/// reason produces it instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Bytes(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    #[default]
    Absent,
}

impl AttributeValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, AttributeValue::Absent)
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Text payload, or `fallback` for any other variant.
    pub fn text_or(self, fallback: &str) -> String {
        match self {
            AttributeValue::Text(text) => text,
            _ => fallback.to_string(),
        }
    }

    /// Integer payload, or `fallback` for any other variant.
    pub fn integer_or(&self, fallback: i64) -> i64 {
        self.as_integer().unwrap_or(fallback)
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fallback_applies_to_every_other_kind() {
        assert_eq!(AttributeValue::Text("Darwin".into()).text_or("Undefined"), "Darwin");
        assert_eq!(AttributeValue::Absent.text_or("Undefined"), "Undefined");
        assert_eq!(AttributeValue::Integer(7).text_or("Undefined"), "Undefined");
        assert_eq!(AttributeValue::Bytes(vec![1]).text_or("Undefined"), "Undefined");
    }

    #[test]
    fn test_integer_fallback() {
        assert_eq!(AttributeValue::Integer(42).integer_or(0), 42);
        assert_eq!(AttributeValue::Absent.integer_or(0), 0);
        assert_eq!(AttributeValue::Text("42".into()).integer_or(0), 0);
    }

    #[test]
    fn test_default_is_absent() {
        assert!(AttributeValue::default().is_absent());
    }

    #[test]
    fn test_serialization_shapes() {
        let text = serde_json::to_value(AttributeValue::Text("arm64".into())).unwrap();
        assert_eq!(text, serde_json::json!("arm64"));
        let bytes = serde_json::to_value(AttributeValue::Bytes(vec![0xde, 0xad])).unwrap();
        assert_eq!(bytes, serde_json::json!("dead"));
        let absent = serde_json::to_value(AttributeValue::Absent).unwrap();
        assert!(absent.is_null());
    }
}
