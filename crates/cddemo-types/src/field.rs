use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declared kind of a resource field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Int,
    Bool,
    Array,
    Map,
}

/// Static description of one field of a resource kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
        }
    }
}

/// A field value as seen by validation.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Int(i64),
    Bool(bool),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// `Null`, the empty string, and zero count as unset. Empty arrays and
    /// maps are set: the client supplied a collection, even if empty.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Null | Self::Int(0)) || matches!(self, Self::String(s) if s.is_empty())
    }

    /// The kind of this value, `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::String(_) => Some(FieldKind::String),
            Self::Int(_) => Some(FieldKind::Int),
            Self::Bool(_) => Some(FieldKind::Bool),
            Self::Array(_) => Some(FieldKind::Array),
            Self::Map(_) => Some(FieldKind::Map),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}
