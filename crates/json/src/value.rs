//! The JSON value model.

use std::fmt;

use pcl_error::{Error, ErrorCode, Result};
use pcl_htable::HashTable;

/// JSON object: keys keep their insertion order.
pub type Object = HashTable<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// A real number. NaN and infinities cannot be represented in JSON.
    #[track_caller]
    pub fn real(n: f64) -> Result<Self> {
        if n.is_nan() {
            return Err(Error::with_msg(ErrorCode::Invalid, "NaN not supported"));
        }
        if n.is_infinite() {
            return Err(Error::with_msg(ErrorCode::Invalid, "Infinity not supported"));
        }
        Ok(Value::Real(n))
    }

    /// A string from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        pcl_string::utf8_check(bytes).map_err(|e| e.trace_msg("invalid json string"))?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::with_msg(ErrorCode::IllegalSeq, e.to_string()))?;
        Ok(Value::String(s.to_string()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value of an integer or real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Member of an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Element of an array.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|a| a.get(index))
    }

    /// Adds a member to an object. Keys must be unique.
    #[track_caller]
    pub fn obj_put(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        let Value::Object(obj) = self else {
            return Err(Error::with_msg(
                ErrorCode::Type,
                format!("expected object, got {}", self.type_name()),
            ));
        };
        match obj.put(key, value, true) {
            Ok(_) => Ok(()),
            Err(e) if e.is(ErrorCode::Exist) => Err(Error::with_msg(
                ErrorCode::Exist,
                "duplicate object key",
            )),
            Err(e) => Err(e.trace()),
        }
    }

    /// Adds or replaces a member, returning the previous value.
    pub fn obj_set(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        match self {
            Value::Object(obj) => obj.insert(key.into(), value).map_err(|e| e.trace()),
            other => Err(Error::with_msg(
                ErrorCode::Type,
                format!("expected object, got {}", other.type_name()),
            )),
        }
    }

    pub fn obj_remove(&mut self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.remove(key),
            _ => None,
        }
    }

    /// Appends an element to an array.
    #[track_caller]
    pub fn arr_add(&mut self, value: Value) -> Result<()> {
        match self {
            Value::Array(arr) => {
                arr.push(value);
                Ok(())
            }
            other => Err(Error::with_msg(
                ErrorCode::Type,
                format!("expected array, got {}", other.type_name()),
            )),
        }
    }

    /// Number of elements or members; 0 for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Array(a) => a.len(),
            Value::Object(o) => o.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode(self, f.alternate()))
    }
}
