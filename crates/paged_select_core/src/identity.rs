//! Option identity and label projection
//!
//! The engine never inspects options directly. Two strategy functions,
//! supplied at construction, project an option to its identity (the key used
//! for deduplication and selection) and its display label.
//!
//! For dynamically shaped records (`serde_json::Value`) [`Accessors::conventional`]
//! provides the usual fallback chain:
//!
//! - identity: `value` field, then `id` field, then the record itself
//! - label: `label` field, then `name` field, then the stringified record
//!
//! # Example
//!
//! ```
//! use paged_select_core::identity::{Accessors, OptionKey};
//! use serde_json::json;
//!
//! let accessors = Accessors::conventional();
//! let user = json!({ "id": 7, "name": "User 7" });
//!
//! assert_eq!(accessors.identity_of(&user), OptionKey::Int(7));
//! assert_eq!(accessors.label_of(&user), "User 7");
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A comparable, stable option identity
pub trait Identity: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Whether this identity is null/empty and must never be rendered
    fn is_blank(&self) -> bool {
        false
    }
}

impl Identity for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Identity for &'static str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Identity> Identity for Option<K> {
    fn is_blank(&self) -> bool {
        self.as_ref().map_or(true, Identity::is_blank)
    }
}

macro_rules! impl_identity_for_ints {
    ($($ty:ty),*) => {
        $(impl Identity for $ty {})*
    };
}

impl_identity_for_ints!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char);

/// Identity extracted from a JSON record
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionKey {
    /// Missing or `null`
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    /// Any other JSON value, keyed by its canonical serialization
    Json(String),
}

impl OptionKey {
    /// Build a key from a JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => OptionKey::Null,
            Value::Bool(b) => OptionKey::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => OptionKey::Int(i),
                None => OptionKey::Json(n.to_string()),
            },
            Value::String(s) => OptionKey::Text(s.clone()),
            other => OptionKey::Json(other.to_string()),
        }
    }
}

impl Identity for OptionKey {
    fn is_blank(&self) -> bool {
        match self {
            OptionKey::Null => true,
            OptionKey::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::Null => f.write_str("null"),
            OptionKey::Bool(b) => write!(f, "{}", b),
            OptionKey::Int(i) => write!(f, "{}", i),
            OptionKey::Text(s) | OptionKey::Json(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionKey {
    fn from(value: i64) -> Self {
        OptionKey::Int(value)
    }
}

impl From<&str> for OptionKey {
    fn from(value: &str) -> Self {
        OptionKey::Text(value.to_string())
    }
}

impl From<String> for OptionKey {
    fn from(value: String) -> Self {
        OptionKey::Text(value)
    }
}

/// Projects an option to its identity
pub type IdentityFn<O, K> = Arc<dyn Fn(&O) -> K + Send + Sync>;

/// Projects an option to its display label
pub type LabelFn<O> = Arc<dyn Fn(&O) -> String + Send + Sync>;

/// Identity and label strategies for an option type
pub struct Accessors<O, K> {
    identity: IdentityFn<O, K>,
    label: LabelFn<O>,
}

impl<O, K> Clone for Accessors<O, K> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            label: Arc::clone(&self.label),
        }
    }
}

impl<O, K> fmt::Debug for Accessors<O, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors").finish_non_exhaustive()
    }
}

impl<O, K: Identity> Accessors<O, K> {
    /// Create accessors from explicit identity and label functions
    pub fn new<I, L>(identity: I, label: L) -> Self
    where
        I: Fn(&O) -> K + Send + Sync + 'static,
        L: Fn(&O) -> String + Send + Sync + 'static,
    {
        Self {
            identity: Arc::new(identity),
            label: Arc::new(label),
        }
    }

    /// Use the option's `Display` output as its label
    pub fn displayed<I>(identity: I) -> Self
    where
        O: fmt::Display,
        I: Fn(&O) -> K + Send + Sync + 'static,
    {
        Self::new(identity, |option: &O| option.to_string())
    }

    /// Replace the identity strategy
    pub fn with_identity<I>(mut self, identity: I) -> Self
    where
        I: Fn(&O) -> K + Send + Sync + 'static,
    {
        self.identity = Arc::new(identity);
        self
    }

    /// Replace the label strategy
    pub fn with_label<L>(mut self, label: L) -> Self
    where
        L: Fn(&O) -> String + Send + Sync + 'static,
    {
        self.label = Arc::new(label);
        self
    }

    pub fn identity_of(&self, option: &O) -> K {
        (self.identity)(option)
    }

    pub fn label_of(&self, option: &O) -> String {
        (self.label)(option)
    }
}

impl Accessors<Value, OptionKey> {
    /// Conventional field lookup for JSON records
    pub fn conventional() -> Self {
        Self::new(conventional_identity, conventional_label)
    }
}

/// JavaScript-style truthiness, used to skip empty conventional fields
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn conventional_field<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| record.get(field))
        .find(|value| is_truthy(value))
}

fn conventional_identity(record: &Value) -> OptionKey {
    let value = conventional_field(record, &["value", "id"]).unwrap_or(record);
    OptionKey::from_json(value)
}

fn conventional_label(record: &Value) -> String {
    match conventional_field(record, &["label", "name"]).unwrap_or(record) {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conventional_identity_prefers_value_then_id() {
        let accessors = Accessors::conventional();

        let with_value = json!({ "value": "us", "id": 1 });
        assert_eq!(accessors.identity_of(&with_value), OptionKey::from("us"));

        let with_id = json!({ "id": 42, "name": "Answer" });
        assert_eq!(accessors.identity_of(&with_id), OptionKey::Int(42));

        // Empty value falls through to id
        let empty_value = json!({ "value": "", "id": 9 });
        assert_eq!(accessors.identity_of(&empty_value), OptionKey::Int(9));

        // Bare scalars are their own identity
        assert_eq!(accessors.identity_of(&json!("plain")), OptionKey::from("plain"));
    }

    #[test]
    fn test_conventional_label_chain() {
        let accessors = Accessors::conventional();

        assert_eq!(accessors.label_of(&json!({ "label": "L", "name": "N" })), "L");
        assert_eq!(accessors.label_of(&json!({ "name": "N" })), "N");
        assert_eq!(accessors.label_of(&json!("raw")), "raw");
        assert_eq!(accessors.label_of(&json!(12)), "12");
    }

    #[test]
    fn test_explicit_accessors_override_conventions() {
        let accessors = Accessors::conventional()
            .with_identity(|v: &Value| OptionKey::from_json(&v["email"]))
            .with_label(|v: &Value| format!("{} <{}>", v["name"].as_str().unwrap_or(""), v["email"].as_str().unwrap_or("")));

        let user = json!({ "id": 1, "name": "Ann", "email": "ann@example.com" });
        assert_eq!(accessors.identity_of(&user), OptionKey::from("ann@example.com"));
        assert_eq!(accessors.label_of(&user), "Ann <ann@example.com>");
    }

    #[test]
    fn test_blank_identities() {
        assert!(OptionKey::Null.is_blank());
        assert!(OptionKey::Text(String::new()).is_blank());
        assert!(!OptionKey::Int(0).is_blank());
        assert!(String::new().is_blank());
        assert!(!7u32.is_blank());
        assert!(None::<u32>.is_blank());
        assert!(!Some(3u32).is_blank());
    }

    #[test]
    fn test_displayed_accessors() {
        let accessors: Accessors<u32, u32> = Accessors::displayed(|n: &u32| *n);
        assert_eq!(accessors.identity_of(&5), 5);
        assert_eq!(accessors.label_of(&5), "5");
    }
}
