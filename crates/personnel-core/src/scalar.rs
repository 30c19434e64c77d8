//! Deserialisers for text fields that also take JSON numbers and booleans.
//! `612345678` arrives as `"612345678"`, `true` as `"true"`.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

fn to_text<E: de::Error>(value: Value) -> Result<Option<String>, E> {
  match value {
    Value::Null => Ok(None),
    Value::String(s) => Ok(Some(s)),
    Value::Number(n) => Ok(Some(n.to_string())),
    Value::Bool(b) => Ok(Some(b.to_string())),
    Value::Array(_) => Err(E::invalid_type(de::Unexpected::Seq, &"a string")),
    Value::Object(_) => Err(E::invalid_type(de::Unexpected::Map, &"a string")),
  }
}

/// An optional text field; `null` reads as `None`.
pub(crate) fn text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  to_text(Value::deserialize(d)?)
}

/// Like [`text`], but keeps a present `null` apart from an absent key.
pub(crate) fn present_text<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  text(d).map(Some)
}
