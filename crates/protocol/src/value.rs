//! Tagged value unions carried inside component and action definitions.
//!
//! The protocol never sends bare scalars: every property value and every data
//! update entry is tagged by kind so receivers can match exhaustively instead
//! of inspecting shapes at runtime.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A property value that is either embedded in the definition or bound to a
/// data model path.
///
/// A `ValueSource` is immutable once embedded in a component or action; its
/// *resolved* value is never cached, so bound sources always reflect the data
/// model at resolution time.
///
/// Wire form is externally tagged:
/// `{"literalString": "hi"}`, `{"literalNumber": 4}`,
/// `{"literalBoolean": true}`, `{"path": "/user/name"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ValueSource {
    #[serde(rename = "literalString")]
    LiteralString(String),
    #[serde(rename = "literalNumber")]
    LiteralNumber(#[serde(serialize_with = "serialize_number")] f64),
    #[serde(rename = "literalBoolean")]
    LiteralBoolean(bool),
    /// Slash-delimited data model path, e.g. `/user/name`.
    #[serde(rename = "path")]
    Path(String),
}

impl ValueSource {
    /// Returns true for sources that read the data model.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// The embedded literal as a JSON value, or `None` for bound sources.
    pub fn literal(&self) -> Option<Value> {
        match self {
            Self::LiteralString(s) => Some(Value::String(s.clone())),
            Self::LiteralNumber(n) => Some(json_number(*n)),
            Self::LiteralBoolean(b) => Some(Value::Bool(*b)),
            Self::Path(_) => None,
        }
    }

    /// The bound path, or `None` for literals.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(p) => Some(p.as_str()),
            _ => None,
        }
    }
}

/// Scalar payload of a single `dataModelUpdate` entry, tagged by kind.
///
/// Wire form is externally tagged and flattened next to the entry key:
/// `{"key": "name", "valueString": "John"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueNumber")]
    Number(#[serde(serialize_with = "serialize_number")] f64),
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
}

impl DataValue {
    /// Converts the tagged scalar into a JSON value for storage.
    pub fn into_json(self) -> Value {
        match self {
            Self::String(s) => Value::String(s),
            Self::Number(n) => json_number(n),
            Self::Boolean(b) => Value::Bool(b),
        }
    }
}

/// Builds a JSON number, collapsing integral floats to integers so a count
/// delivered as `42` renders as `42` rather than `42.0`. Non-finite input
/// degrades to null (JSON has no representation for it).
pub(crate) fn json_number(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Serializes wire numbers through [`json_number`] so an integral value read
/// as `4` writes back as `4`, keeping the wire round-trip symmetric.
fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    json_number(*n).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_source_wire_shapes() {
        let cases = [
            (ValueSource::LiteralString("hi".into()), json!({"literalString": "hi"})),
            (ValueSource::LiteralNumber(4.0), json!({"literalNumber": 4})),
            (ValueSource::LiteralNumber(1.5), json!({"literalNumber": 1.5})),
            (ValueSource::LiteralBoolean(true), json!({"literalBoolean": true})),
            (ValueSource::Path("/user/name".into()), json!({"path": "/user/name"})),
        ];
        for (source, wire) in cases {
            assert_eq!(serde_json::to_value(&source).unwrap(), wire);
            assert_eq!(serde_json::from_value::<ValueSource>(wire).unwrap(), source);
        }
    }

    #[test]
    fn literal_extraction() {
        assert_eq!(
            ValueSource::LiteralString("hi".into()).literal(),
            Some(json!("hi"))
        );
        assert_eq!(ValueSource::LiteralNumber(42.0).literal(), Some(json!(42)));
        assert_eq!(ValueSource::Path("/x".into()).literal(), None);
    }

    #[test]
    fn data_value_into_json() {
        assert_eq!(DataValue::String("a".into()).into_json(), json!("a"));
        assert_eq!(DataValue::Number(42.0).into_json(), json!(42));
        assert_eq!(DataValue::Number(1.5).into_json(), json!(1.5));
        assert_eq!(DataValue::Boolean(false).into_json(), json!(false));
    }

    #[test]
    fn integral_wire_numbers_round_trip_symmetrically() {
        let wire = json!({"valueNumber": 30});
        let value: DataValue = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(value, DataValue::Number(30.0));
        assert_eq!(serde_json::to_value(&value).unwrap(), wire);
    }

    #[test]
    fn non_finite_numbers_degrade_to_null() {
        assert_eq!(DataValue::Number(f64::NAN).into_json(), Value::Null);
        assert_eq!(DataValue::Number(f64::INFINITY).into_json(), Value::Null);
    }
}
