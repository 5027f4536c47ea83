//! Dynamic values for the helper namespace
//!
//! Page scripts hand the helpers loosely-typed data. `Value` models that
//! data, and `Object` keeps own attributes apart from the ones reachable
//! through its prototype so "own" is observable.

use std::fmt;

/// Loosely-typed value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Truthiness: `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

/// Key passed to iteration callbacks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

/// Object with own attributes and an optional prototype
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    own: Vec<(String, Value)>,
    proto: Option<Box<Object>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object whose lookups fall back to `proto`
    pub fn with_proto(proto: Object) -> Self {
        Self { own: Vec::new(), proto: Some(Box::new(proto)) }
    }

    pub fn proto(&self) -> Option<&Object> {
        self.proto.as_deref()
    }

    /// Set an own attribute, overwriting in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.own.iter().position(|(k, _)| *k == key) {
            Some(i) => self.own[i].1 = value,
            None => self.own.push((key, value)),
        }
        self
    }

    /// Builder form of `insert`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.own.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Lookup through the prototype chain
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.get_own(key).or_else(|| self.proto.as_ref()?.get(key))
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.get_own(key).is_some()
    }

    /// Own or inherited
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.own.len()
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }

    /// Own keys in enumeration order: integer-like keys ascending, then the
    /// rest in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        let mut indexed: Vec<(u32, &str)> = Vec::new();
        let mut named = Vec::new();
        for (key, _) in &self.own {
            match array_index(key) {
                Some(i) => indexed.push((i, key.as_str())),
                None => named.push(key.as_str()),
            }
        }
        indexed.sort_unstable_by_key(|&(i, _)| i);
        indexed.into_iter().map(|(_, k)| k).chain(named).collect()
    }

    /// Own entries in enumeration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keys().into_iter().filter_map(move |k| self.get_own(k).map(|v| (k, v)))
    }
}

/// Canonical array index: digits without leading zeros, below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        for falsy in [Value::Undefined, Value::Null, false.into(), 0.into(), f64::NAN.into(), "".into()] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [Value::Array(vec![]), true.into(), 1.into(), "0".into(), Object::new().into()] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn test_prototype_lookup() {
        let proto = Object::new().with("shared", 1);
        let obj = Object::with_proto(proto).with("own", 2);

        assert!(obj.has_own("own"));
        assert!(!obj.has_own("shared"));
        assert!(obj.has("shared"));
        assert_eq!(obj.get("shared"), Some(&Value::Number(1.0)));
        assert_eq!(obj.keys(), vec!["own"]);
    }

    #[test]
    fn test_key_order() {
        let obj = Object::new()
            .with("b", 1)
            .with("2", 2)
            .with("a", 3)
            .with("0", 4)
            .with("01", 5);
        assert_eq!(obj.keys(), vec!["0", "2", "b", "a", "01"]);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut obj = Object::new().with("x", 1).with("y", 2);
        obj.insert("x", 10);
        assert_eq!(obj.keys(), vec!["x", "y"]);
        assert_eq!(obj.get_own("x"), Some(&Value::Number(10.0)));
    }
}
