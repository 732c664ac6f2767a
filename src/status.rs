//! Normalized status identifiers and their exported form.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static INTERNED: Lazy<Mutex<HashSet<Arc<str>>>> = Lazy::new(|| Mutex::new(HashSet::new()));

const TRUE_TOKEN: &str = "true";
const FALSE_TOKEN: &str = "false";

/// Case- and whitespace-normalized status token.
///
/// Normalization trims surrounding whitespace, drops a leading `:` sigil,
/// lowercases, and collapses interior whitespace runs into a single `_`.
/// Two identifiers are equal iff their normalized spellings match.
///
/// Only declared tags are interned (see [`StatusId::interned`]); ad hoc
/// statuses and lookup names own their spelling and are freed with them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusId(Arc<str>);

impl StatusId {
    /// Normalize a raw token.
    pub fn new(raw: &str) -> Self {
        Self(Arc::from(normalize(raw)))
    }

    /// Normalize a raw token and share its storage with every other
    /// interned identifier of the same spelling. The table only grows, so
    /// this is reserved for declared tags.
    pub fn interned(raw: &str) -> Self {
        Self(intern(normalize(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the boolean literal when this is the canonical `true`/`false` token.
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_str() {
            TRUE_TOKEN => Some(true),
            FALSE_TOKEN => Some(false),
            _ => None,
        }
    }

    /// Exported form: the boolean literal for `true`/`false`, the token otherwise.
    pub fn export(&self) -> ExportedStatus {
        match self.as_bool() {
            Some(flag) => ExportedStatus::Bool(flag),
            None => ExportedStatus::Tag(self.clone()),
        }
    }
}

fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start();
    trimmed
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

fn intern(normalized: String) -> Arc<str> {
    let mut table = INTERNED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(existing) = table.get(normalized.as_str()) {
        return existing.clone();
    }
    let token: Arc<str> = Arc::from(normalized);
    table.insert(token.clone());
    token
}

impl fmt::Debug for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for StatusId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&String> for StatusId {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}

impl From<bool> for StatusId {
    fn from(flag: bool) -> Self {
        Self::new(if flag { TRUE_TOKEN } else { FALSE_TOKEN })
    }
}

impl From<&StatusId> for StatusId {
    fn from(id: &StatusId) -> Self {
        id.clone()
    }
}

impl Serialize for StatusId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(StatusId::new(&raw))
    }
}

/// Status as it appears in the flat two-field export.
///
/// Deserializing sends both JSON booleans and strings through
/// [`StatusId::export`], so `"TRUE"` yields `Bool(true)` and a `Tag` never
/// holds a `true`/`false` token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ExportedStatus {
    Bool(bool),
    Tag(StatusId),
}

impl<'de> Deserialize<'de> for ExportedStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawStatus {
            Bool(bool),
            Text(String),
        }

        let status = match RawStatus::deserialize(deserializer)? {
            RawStatus::Bool(flag) => StatusId::from(flag),
            RawStatus::Text(raw) => StatusId::new(&raw),
        };
        Ok(status.export())
    }
}

impl ExportedStatus {
    /// The status token this export came from.
    pub fn status(&self) -> StatusId {
        match self {
            ExportedStatus::Bool(flag) => StatusId::from(*flag),
            ExportedStatus::Tag(id) => id.clone(),
        }
    }
}

impl fmt::Display for ExportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportedStatus::Bool(flag) => write!(f, "{flag}"),
            ExportedStatus::Tag(id) => write!(f, ":{id}"),
        }
    }
}

impl From<&str> for ExportedStatus {
    fn from(raw: &str) -> Self {
        StatusId::new(raw).export()
    }
}

impl From<bool> for ExportedStatus {
    fn from(flag: bool) -> Self {
        ExportedStatus::Bool(flag)
    }
}
