//! Storage keys for access graph collections
//!
//! Cluster objects are keyed by `namespace:name`. The colon never appears in
//! a Kubernetes namespace or object name, which keeps the key injective.
//! Identity objects are keyed by their ARN.

/// Separator between namespace and name in a composite key
pub const KEY_SEPARATOR: char = ':';

/// Join a namespace and a name into a composite key
pub fn compose_key(namespace: &str, name: &str) -> String {
    format!("{}{}{}", namespace, KEY_SEPARATOR, name)
}

/// Split a composite key at the first separator
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_SEPARATOR)
}

/// A record that knows its own storage key
///
/// Collections in the access graph are always indexed through this trait so
/// a key can never drift from the record it points at.
pub trait Keyed {
    fn key(&self) -> String;
}
