//! Untyped input a form can extract fields from
//!
//! Extraction tries typed attribute access first, then string-key lookup,
//! and falls back to the empty string. A form never sees an absent value.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::{Map, Value};

use crate::post::{Post, PostAttributes};

/// Something a form can pull `title`, `description` and `body` out of.
pub trait FormSource {
    /// Typed accessor for `name`, for record-like sources.
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    /// String-key lookup, for map-like sources.
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }

    /// Attribute first, then lookup, then `""`.
    fn extract(&self, name: &str) -> String {
        self.attribute(name)
            .or_else(|| self.lookup(name))
            .unwrap_or_default()
    }
}

impl<T: FormSource + ?Sized> FormSource for &T {
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }

    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }
}

impl FormSource for Post {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id().to_owned()),
            "title" => Some(self.title().to_owned()),
            "description" => Some(self.description().to_owned()),
            "body" => Some(self.body().to_owned()),
            _ => None,
        }
    }
}

impl FormSource for PostAttributes {
    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "description" => Some(self.description.clone()),
            "body" => Some(self.body.clone()),
            _ => None,
        }
    }
}

impl<K, V, S> FormSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_owned())
    }
}

impl<K, V> FormSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_owned())
    }
}

/// Key/value pairs; the first pair with a matching key wins.
impl<K, V> FormSource for [(K, V)]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref().to_owned())
    }
}

impl<K, V, const N: usize> FormSource for [(K, V); N]
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self.as_slice().lookup(key)
    }
}

impl FormSource for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }
}

/// Objects are looked up by key; any other JSON value has no fields.
impl FormSource for Value {
    fn lookup(&self, key: &str) -> Option<String> {
        self.as_object().and_then(|map| map.lookup(key))
    }
}

/// Strings as-is, numbers and booleans as their JSON text; null, arrays
/// and objects extract as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
