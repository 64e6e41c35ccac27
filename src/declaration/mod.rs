//! # Declarations
//!
//! The tagged input model consumed by the [`Loader`](crate::Loader).
//!
//! A [`Scope`] is one `describe`/`context` block: an optional explicit
//! subject plus an ordered list of [`Declaration`]s. Each declaration carries
//! the label it was declared with, its source-order index, a [`Marker`] and
//! an [`Item`] saying what it is.
//!
//! Scopes are produced either by the explicit [`SpecBuilder`](crate::SpecBuilder)
//! or by decoding convention-named members with [`naming`](crate::naming).
//! The loader never inspects names; everything it needs is tagged here.

use std::fmt;

use crate::context::{Body, Helper};
use crate::subject::Subject;

// ------------------------------------------------------------------------------------------------
// Marker
// ------------------------------------------------------------------------------------------------

/// Focus/skip classification of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    Normal,

    /// Skipped: loaded with `pending = true`.
    Pending,

    /// Focused: every sibling declared before it is demoted to pending, and
    /// every sibling declared after it is pending too.
    IgnoreRest,

    /// A top-level ignore-rest scope with no siblings. Its nested scopes are
    /// loaded pending; its own leaves follow the normal rules.
    ///
    /// Derived by the classifier, never declared.
    IgnoreRestAsRoot,
}

impl Marker {
    pub fn is_ignore_rest(self) -> bool {
        matches!(self, Self::IgnoreRest | Self::IgnoreRestAsRoot)
    }
}

// ------------------------------------------------------------------------------------------------
// Item
// ------------------------------------------------------------------------------------------------

/// What a declaration contributes to its scope.
#[derive(Clone)]
pub enum Item {
    /// A nested `describe`/`context` block.
    Scope(Scope),

    /// A leaf example (`it`).
    Example(Body),

    /// A lifecycle hook. `phase` is the full hook name (`before_each`,
    /// `after_all`, ...) and is interpreted by the runner.
    Hook { phase: String, body: Body },

    /// Any other callable, bound into the shared execution context.
    Helper(Helper),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Scope(_) => ItemKind::Scope,
            Self::Example(_) => ItemKind::Example,
            Self::Hook { .. } => ItemKind::Hook,
            Self::Helper(_) => ItemKind::Helper,
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope(scope) => f.debug_tuple("Scope").field(scope).finish(),
            Self::Example(_) => f.write_str("Example"),
            Self::Hook { phase, .. } => f.debug_struct("Hook").field("phase", phase).finish(),
            Self::Helper(_) => f.write_str("Helper"),
        }
    }
}

/// Discriminant of [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Scope,
    Example,
    Hook,
    Helper,
}

// ------------------------------------------------------------------------------------------------
// Declaration
// ------------------------------------------------------------------------------------------------

/// One named member of a scope.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Label as declared, after any synthetic prefix has been removed.
    pub name: String,

    /// Stable source-order index (for decoded files, the line number).
    pub order: u32,

    pub marker: Marker,

    pub item: Item,
}

impl Declaration {
    pub fn new(name: impl Into<String>, order: u32, marker: Marker, item: Item) -> Self {
        Self {
            name: name.into(),
            order,
            marker,
            item,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.item.kind()
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match &self.item {
            Item::Scope(scope) => Some(scope),
            _ => None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Scope
// ------------------------------------------------------------------------------------------------

/// A `describe`/`context` block, or the root module of a declaration file.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Explicit subject, overriding the declared label.
    pub subject: Option<Subject>,

    declarations: Vec<Declaration>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(subject: Subject) -> Self {
        Self {
            subject: Some(subject),
            declarations: Vec::new(),
        }
    }

    pub fn push(&mut self, decl: Declaration) {
        self.declarations.push(decl);
    }

    /// Declarations in insertion order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Declarations of `kind` in declaration order.
    ///
    /// Sorting by `order` is stable, so equal indices keep insertion order.
    pub fn ordered(&self, kind: ItemKind) -> Vec<&Declaration> {
        let mut out: Vec<_> = self
            .declarations
            .iter()
            .filter(|d| d.kind() == kind)
            .collect();
        out.sort_by_key(|d| d.order);
        out
    }
}
