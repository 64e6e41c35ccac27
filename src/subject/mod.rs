//! Subject resolution for example groups.
//!
//! A group's subject is either the explicit value its scope declares (text or
//! a type under test) or a label derived from the scope's declared name.
//! Convention names carry a synthetic fixed-length prefix and trailing
//! marker segments (`__description`, `__pending`, `__ignore_rest`), both of
//! which are removed before display.


use std::{
    any::{TypeId, type_name},
    fmt,
};

use tracing::debug;

/// Marker segments a convention scope name may end with.
pub const MARKER_SUFFIXES: [&str; 3] = ["__description", "__pending", "__ignore_rest"];

/// Opaque reference to the type under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubjectType {
    id: TypeId,
    name: &'static str,
}

impl SubjectType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `alloc::string::String`.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, generics included.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

/// What an example group describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Text(String),
    Type(SubjectType),
}

impl Subject {
    pub fn text(label: impl Into<String>) -> Self {
        Self::Text(label.into())
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(SubjectType::of::<T>())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Type(_) => None,
        }
    }

    pub fn as_type(&self) -> Option<SubjectType> {
        match self {
            Self::Text(_) => None,
            Self::Type(t) => Some(*t),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Type(t) => f.write_str(t.short_name()),
        }
    }
}

impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Subject {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Removes every occurrence of the marker segments from `name`.
pub fn strip_markers(name: &str) -> String {
    MARKER_SUFFIXES
        .iter()
        .fold(name.to_string(), |acc, marker| acc.replace(marker, ""))
}

/// Drops the first `prefix_len` characters of `name`.
///
/// Names shorter than the prefix yield an empty string.
pub fn strip_prefix(name: &str, prefix_len: usize) -> &str {
    match name.char_indices().nth(prefix_len) {
        Some((idx, _)) => &name[idx..],
        None => "",
    }
}

/// Derives the display label of a convention scope name.
pub fn derive(name: &str, prefix_len: usize) -> String {
    let stripped = strip_markers(name);
    let label = strip_prefix(&stripped, prefix_len);
    if label.is_empty() {
        debug!(name, "scope name has no subject text");
    }
    label.to_string()
}

/// Resolves the subject of a scope.
///
/// An explicit subject wins verbatim; otherwise `label` is used as text.
pub fn resolve(label: &str, explicit: Option<&Subject>) -> Subject {
    match explicit {
        Some(subject) => subject.clone(),
        None => Subject::Text(label.to_string()),
    }
}
