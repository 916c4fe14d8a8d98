//! Request payloads.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Payload of a request.
///
/// Only a single structured encoding is supported: `Structured` values are
/// sent as compact JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    /// Sent verbatim.
    Raw(String),
    Structured(Value),
}

impl Body {
    /// Serialize any `Serialize` value into a structured body.
    ///
    /// Serialization failures surface here, before any connection is opened.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Body::Structured)
            .map_err(Error::Serialization)
    }

    /// Wire text of the payload.
    pub fn payload(&self) -> String {
        match self {
            Body::Empty => String::new(),
            Body::Raw(text) => text.clone(),
            Body::Structured(value) => value.to_string(),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Raw(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Raw(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Structured(value)
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn empty_body_has_empty_payload() {
        assert_eq!(Body::Empty.payload(), "");
        assert_eq!(Body::from(None::<&str>).payload(), "");
        assert_eq!(Body::from(()), Body::Empty);
    }

    #[test]
    fn raw_text_is_used_verbatim() {
        let body = Body::from("name=x&line\nbreak");
        assert_eq!(body.payload(), "name=x&line\nbreak");
    }

    #[test]
    fn structured_value_is_compact_json() {
        let body = Body::from(json!({"a": 1}));
        assert_eq!(body.payload(), r#"{"a":1}"#);
    }

    #[test]
    fn json_accepts_serializable_types() {
        let mut map = BTreeMap::new();
        map.insert("AutoRemove", json!(true));
        map.insert("Image", json!("nginx"));
        let body = Body::json(&map).unwrap();
        assert_eq!(body.payload(), r#"{"AutoRemove":true,"Image":"nginx"}"#);
    }

    #[test]
    fn json_rejects_non_string_map_keys() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");
        let err = Body::json(&map).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
