//! Helper namespace
//!
//! Type checks, shallow merge and uniform iteration over arrays, array-likes
//! and plain objects. The same functions are reachable as free functions and
//! through the [`Helpers`] value attached to every published constructor.

use std::str::FromStr;

use crate::error::{fail, QueryError, Result};
use crate::value::{Key, Object, Value};

/// Semantic kind accepted by [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Array,
    Object,
}

impl FromStr for Kind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Kind::String),
            "array" => Ok(Kind::Array),
            "object" => Ok(Kind::Object),
            other => Err(QueryError::invalid_argument("classify", format!("unknown kind '{other}'"))),
        }
    }
}

/// Whether `value` is of the given kind.
///
/// `Object` is true for arrays and objects alike, never for `null`.
pub fn classify(value: &Value, kind: Kind) -> bool {
    match kind {
        Kind::String => matches!(value, Value::String(_)),
        Kind::Array => matches!(value, Value::Array(_)),
        Kind::Object => matches!(value, Value::Array(_) | Value::Object(_)),
    }
}

/// True for arrays and for objects exposing a `length` attribute (own or
/// inherited). Falsy input is an `InvalidArgument` error.
pub fn is_collection_like(value: &Value) -> Result<bool> {
    if !value.is_truthy() {
        return fail(QueryError::invalid_argument("is_collection_like", "invalid query"));
    }
    Ok(match value {
        Value::Array(_) => true,
        Value::Object(obj) => obj.has("length"),
        _ => false,
    })
}

/// Copy every own attribute of `source` onto `target`, overwriting.
pub fn merge<'t>(target: &'t mut Object, source: &Object) -> &'t mut Object {
    for (key, value) in source.entries() {
        target.insert(key, value.clone());
    }
    target
}

/// Always fails; the message names the module, `origin` and `message`.
pub fn raise_error<T>(origin: &str, message: &str) -> Result<T> {
    fail(QueryError::raised(origin, message))
}

static UNDEFINED: Value = Value::Undefined;

/// Lazy pass over a collection.
///
/// Array-likes yield indices `0..length`, plain objects yield own keys in
/// enumeration order, anything else yields nothing. Each call to
/// [`entries`] starts a fresh pass.
#[derive(Debug)]
pub struct Entries<'a> {
    collection: &'a Value,
    state: EntriesState<'a>,
}

#[derive(Debug)]
enum EntriesState<'a> {
    Indexed { next: usize, len: usize },
    Keyed { keys: std::vec::IntoIter<&'a str> },
    Done,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a Value, Key);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            EntriesState::Indexed { next, len } => {
                if *next >= *len {
                    self.state = EntriesState::Done;
                    return None;
                }
                let index = *next;
                *next += 1;
                let value = match self.collection {
                    Value::Array(items) => items.get(index),
                    Value::Object(obj) => obj.get(&index.to_string()),
                    _ => None,
                };
                Some((value.unwrap_or(&UNDEFINED), Key::Index(index)))
            }
            EntriesState::Keyed { keys } => {
                let obj = self.collection.as_object()?;
                let key = keys.next()?;
                let value = obj.get_own(key).unwrap_or(&UNDEFINED);
                Some((value, Key::Name(key.to_string())))
            }
            EntriesState::Done => None,
        }
    }
}

/// Start a pass over `collection`; falsy input is an error, as with
/// [`is_collection_like`].
pub fn entries(collection: &Value) -> Result<Entries<'_>> {
    let state = if is_collection_like(collection)? {
        EntriesState::Indexed { next: 0, len: length_of(collection) }
    } else if let Value::Object(obj) = collection {
        EntriesState::Keyed { keys: obj.keys().into_iter() }
    } else {
        EntriesState::Done
    };
    Ok(Entries { collection, state })
}

/// Element count of an array-like; a non-numeric `length` counts as zero.
fn length_of(collection: &Value) -> usize {
    match collection {
        Value::Array(items) => items.len(),
        Value::Object(obj) => match obj.get("length").and_then(Value::as_number) {
            Some(n) if n.is_finite() && n > 0.0 => n.trunc() as usize,
            _ => 0,
        },
        _ => 0,
    }
}

/// Invoke `callback(value, key, collection)` for every entry, in order.
///
/// Returns the collection it was given.
pub fn for_each_entry<'a, F>(collection: &'a Value, mut callback: F) -> Result<&'a Value>
where
    F: FnMut(&Value, Key, &Value),
{
    for (value, key) in entries(collection)? {
        callback(value, key, collection);
    }
    Ok(collection)
}

/// The helper namespace as a value, attached to each constructor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Helpers;

impl Helpers {
    pub fn classify(&self, value: &Value, kind: Kind) -> bool {
        classify(value, kind)
    }

    pub fn is_collection_like(&self, value: &Value) -> Result<bool> {
        is_collection_like(value)
    }

    pub fn merge<'t>(&self, target: &'t mut Object, source: &Object) -> &'t mut Object {
        merge(target, source)
    }

    pub fn entries<'a>(&self, collection: &'a Value) -> Result<Entries<'a>> {
        entries(collection)
    }

    pub fn for_each_entry<'a, F>(&self, collection: &'a Value, callback: F) -> Result<&'a Value>
    where
        F: FnMut(&Value, Key, &Value),
    {
        for_each_entry(collection, callback)
    }

    /// Alias of [`Helpers::for_each_entry`]
    pub fn for_each<'a, F>(&self, collection: &'a Value, callback: F) -> Result<&'a Value>
    where
        F: FnMut(&Value, Key, &Value),
    {
        for_each_entry(collection, callback)
    }

    pub fn raise_error<T>(&self, origin: &str, message: &str) -> Result<T> {
        raise_error(origin, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let s = Value::from("x");
        let arr = Value::Array(vec![]);
        let obj = Value::from(Object::new());

        assert!(classify(&s, Kind::String));
        assert!(!classify(&s, Kind::Object));
        assert!(classify(&arr, Kind::Array));
        assert!(classify(&arr, Kind::Object));
        assert!(!classify(&obj, Kind::Array));
        assert!(classify(&obj, Kind::Object));
        assert!(!classify(&Value::Null, Kind::Object));
        assert!(!classify(&Value::Undefined, Kind::Object));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("array".parse::<Kind>().unwrap(), Kind::Array);
        assert!("number".parse::<Kind>().is_err());
    }

    #[test]
    fn test_is_collection_like() {
        assert!(is_collection_like(&Value::Array(vec![])).unwrap());
        assert!(is_collection_like(&Object::new().with("length", 0).into()).unwrap());
        assert!(!is_collection_like(&Object::new().with("size", 2).into()).unwrap());
        assert!(!is_collection_like(&"abc".into()).unwrap());

        // `length` reached through the prototype counts
        let inherited = Object::with_proto(Object::new().with("length", 1));
        assert!(is_collection_like(&inherited.into()).unwrap());
    }

    #[test]
    fn test_is_collection_like_rejects_falsy() {
        for falsy in [Value::Undefined, Value::Null, Value::from(""), Value::from(0)] {
            let err = is_collection_like(&falsy).unwrap_err();
            assert!(matches!(err, QueryError::InvalidArgument { .. }));
            assert_eq!(err.to_string(), "fOS Query, error in is_collection_like: invalid query");
        }
    }

    #[test]
    fn test_merge_own_only() {
        let mut target = Object::new().with("a", 1);
        let source = Object::with_proto(Object::new().with("inherited", true)).with("b", 2);

        merge(&mut target, &source);

        assert_eq!(target, Object::new().with("a", 1).with("b", 2));
        assert!(!target.has("inherited"));
    }

    #[test]
    fn test_merge_overwrites() {
        let mut target = Object::new().with("a", 1).with("b", 1);
        merge(&mut target, &Object::new().with("b", 2));
        assert_eq!(target.get_own("b"), Some(&Value::from(2)));
    }

    #[test]
    fn test_for_each_entry_array() {
        let arr = Value::Array(vec![10.into(), 20.into()]);
        let mut seen = Vec::new();
        let returned = for_each_entry(&arr, |v, k, c| {
            assert_eq!(c, &arr);
            seen.push((v.clone(), k));
        })
        .unwrap();

        assert!(std::ptr::eq(returned, &arr));
        assert_eq!(seen, vec![(Value::from(10), Key::Index(0)), (Value::from(20), Key::Index(1))]);
    }

    #[test]
    fn test_for_each_entry_object() {
        let obj = Value::from(Object::new().with("x", 1).with("y", 2));
        let mut seen = Vec::new();
        for_each_entry(&obj, |v, k, _| seen.push((v.clone(), k))).unwrap();

        assert_eq!(seen, vec![(Value::from(1), Key::from("x")), (Value::from(2), Key::from("y"))]);
    }

    #[test]
    fn test_for_each_entry_array_like_object() {
        let like = Value::from(Object::new().with("length", 3).with("0", "a").with("2", "c"));
        let mut seen = Vec::new();
        for_each_entry(&like, |v, k, _| seen.push((v.clone(), k))).unwrap();

        assert_eq!(
            seen,
            vec![
                (Value::from("a"), Key::Index(0)),
                (Value::Undefined, Key::Index(1)),
                (Value::from("c"), Key::Index(2)),
            ]
        );
    }

    #[test]
    fn test_for_each_entry_scalars_and_falsy() {
        let mut calls = 0;
        for_each_entry(&Value::from("abc"), |_, _, _| calls += 1).unwrap();
        for_each_entry(&Value::from(true), |_, _, _| calls += 1).unwrap();
        assert_eq!(calls, 0);

        assert!(for_each_entry(&Value::Null, |_, _, _| calls += 1).is_err());
    }

    #[test]
    fn test_entries_restart() {
        let arr = Value::Array(vec![1.into(), 2.into(), 3.into()]);
        let first: Vec<Key> = entries(&arr).unwrap().map(|(_, k)| k).collect();
        let second: Vec<Key> = entries(&arr).unwrap().map(|(_, k)| k).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_raise_error() {
        let err = raise_error::<()>("bootstrap", "boom").unwrap_err();
        assert_eq!(err.to_string(), "fOS Query, error in bootstrap: boom");
        assert_eq!(Helpers.raise_error::<()>("bootstrap", "boom").unwrap_err(), err);
    }
}
