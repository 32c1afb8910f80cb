//! Conversions between [`Value`] and `serde_json::Value`.

use crate::value::{Object, Value};

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // u64 beyond i64::MAX and floats
                None => n.as_f64().map_or(Value::Null, Value::Real),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut obj = Object::new();
                for (k, v) in map {
                    // serde_json maps never hold duplicate keys
                    if let Err(e) = obj.put(k, Value::from(v), false) {
                        log::warn!("dropping json member: {e}");
                    }
                }
                Value::Object(obj)
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Real(r) => serde_json::Number::from_f64(*r)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        serde_json::Value::from(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_serde() {
        let v = Value::from(json!({"a": 1, "b": [true, null, 2.5], "c": "x"}));
        assert_eq!(v.get("a"), Some(&Value::Integer(1)));
        assert_eq!(v.get("b").unwrap().at(2), Some(&Value::Real(2.5)));
        assert_eq!(v.get("c").unwrap().as_str(), Some("x"));
    }

    #[test]
    fn test_to_serde() {
        let v = crate::parse_all(r#"{"n": 9223372036854775807, "r": 0.5, "s": [1]}"#).unwrap();
        let s = serde_json::Value::from(&v);
        assert_eq!(s, json!({"n": i64::MAX, "r": 0.5, "s": [1]}));
    }

    #[test]
    fn test_large_unsigned_becomes_real() {
        let v = Value::from(json!(u64::MAX));
        assert!(matches!(v, Value::Real(_)));
    }
}
