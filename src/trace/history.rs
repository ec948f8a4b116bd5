//! History entries and their text encoding
//!
//! An entry is rendered as `[<label>] <key>`. Role and policy keys are ARNs
//! and contain no `]`, cluster keys are `namespace:name`, so the first `]`
//! always ends the label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::EntryKind;

/// One recorded lookup: which kind of entity, and its key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub key: String,
}

impl HistoryEntry {
    pub fn new(kind: EntryKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.label(), self.key)
    }
}

impl FromStr for HistoryEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, key) = s
            .split_once(']')
            .ok_or_else(|| format!("Missing ']' in history entry: {}", s))?;
        let label = label.trim().strip_prefix('[').unwrap_or(label).trim();
        let kind = label.parse::<EntryKind>()?;
        Ok(Self::new(kind, key.trim()))
    }
}
