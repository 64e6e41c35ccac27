//! # Naming Convention
//!
//! Decodes reflected declaration files into tagged [`Scope`]s.
//!
//! Declaration files written for the convention-based front end expose their
//! blocks as named members. The names encode everything:
//!
//! | Member                 | Rule (after the synthetic prefix where noted)          |
//! |------------------------|--------------------------------------------------------|
//! | scope (class)          | raw name ends with `__description`                     |
//! | pending scope          | raw name also contains `__pending`                     |
//! | ignore-rest scope      | raw name also contains `__ignore_rest`                 |
//! | example                | starts with `it` after the prefix                      |
//! | pending example        | starts with `_it` after the prefix                     |
//! | ignore-rest example    | starts with `only_it` after the prefix                 |
//! | hook                   | starts with a hook prefix (`before`, `after`), with or |
//! |                        | without the prefix                                     |
//! | helper                 | any other function                                     |
//!
//! The synthetic prefix (10 characters by default) only makes every
//! declared name unique; it carries no meaning and is dropped from labels.
//! Classes that are not scopes are ignored.


use std::fmt;

use tracing::{debug, trace};

use crate::{
    LoadError, LoaderConfig,
    context::Body,
    declaration::{Declaration, Item, Marker, Scope},
    subject::{self, Subject},
};

/// Suffix every convention scope name ends with.
pub const SCOPE_SUFFIX: &str = "__description";
pub const PENDING_MARKER: &str = "__pending";
pub const IGNORE_REST_MARKER: &str = "__ignore_rest";

pub const EXAMPLE_PREFIX: &str = "it";
pub const PENDING_EXAMPLE_PREFIX: &str = "_it";
pub const IGNORE_REST_EXAMPLE_PREFIX: &str = "only_it";

const KNOWN_SCOPE_SEGMENTS: [&str; 3] = ["description", "pending", "ignore_rest"];

// ------------------------------------------------------------------------------------------------
// Raw input
// ------------------------------------------------------------------------------------------------

/// A reflected module or class: the members an importer discovered.
#[derive(Debug, Clone, Default)]
pub struct RawModule {
    /// Explicit subject attribute, if the class declares one.
    pub subject: Option<Subject>,

    pub members: Vec<RawMember>,
}

/// One reflected member.
#[derive(Debug, Clone)]
pub struct RawMember {
    /// Name exactly as declared, synthetic prefix included.
    pub name: String,

    /// Source-order index, typically the line number.
    pub order: u32,

    pub kind: RawKind,
}

/// Reflected member kind.
#[derive(Clone)]
pub enum RawKind {
    Class(RawModule),
    Function(Body),
}

impl fmt::Debug for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(module) => f.debug_tuple("Class").field(module).finish(),
            Self::Function(_) => f.write_str("Function"),
        }
    }
}

impl RawModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, name: impl Into<String>, order: u32, class: RawModule) -> Self {
        self.members.push(RawMember {
            name: name.into(),
            order,
            kind: RawKind::Class(class),
        });
        self
    }

    pub fn function(mut self, name: impl Into<String>, order: u32, body: Body) -> Self {
        self.members.push(RawMember {
            name: name.into(),
            order,
            kind: RawKind::Function(body),
        });
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }
}

// ------------------------------------------------------------------------------------------------
// Name classification
// ------------------------------------------------------------------------------------------------

pub fn is_scope_name(name: &str) -> bool {
    name.ends_with(SCOPE_SUFFIX)
}

/// Marker of a convention scope name. `__ignore_rest` wins over `__pending`.
pub fn scope_marker(name: &str) -> Marker {
    if name.contains(IGNORE_REST_MARKER) {
        Marker::IgnoreRest
    } else if name.contains(PENDING_MARKER) {
        Marker::Pending
    } else {
        Marker::Normal
    }
}

/// Marker of an example name, or `None` if the name is not an example.
pub fn example_marker(name: &str, prefix_len: usize) -> Option<Marker> {
    let stripped = subject::strip_prefix(name, prefix_len);
    if stripped.starts_with(IGNORE_REST_EXAMPLE_PREFIX) {
        Some(Marker::IgnoreRest)
    } else if stripped.starts_with(PENDING_EXAMPLE_PREFIX) {
        Some(Marker::Pending)
    } else if stripped.starts_with(EXAMPLE_PREFIX) {
        Some(Marker::Normal)
    } else {
        None
    }
}

pub fn is_hook_name<S: AsRef<str>>(name: &str, hook_prefixes: &[S]) -> bool {
    hook_prefixes
        .iter()
        .any(|prefix| name.starts_with(prefix.as_ref()))
}

/// Phase key of a hook name, or `None` if the name is not a hook.
///
/// Both bare (`before_each`) and prefixed (`_000000002before_each`) names are
/// hooks; the key never includes the synthetic prefix.
pub fn hook_phase<'a, S: AsRef<str>>(
    name: &'a str,
    prefix_len: usize,
    hook_prefixes: &[S],
) -> Option<&'a str> {
    if is_hook_name(name, hook_prefixes) {
        return Some(name);
    }
    let stripped = subject::strip_prefix(name, prefix_len);
    is_hook_name(stripped, hook_prefixes).then_some(stripped)
}

/// Marker segments of a scope name that are not recognized.
///
/// Known marker suffixes are peeled off the end of the name first, so a
/// label may itself end in `_`. Whatever `__`-separated segments remain after
/// the label must be known markers.
pub fn unknown_scope_segments(name: &str, prefix_len: usize) -> Vec<&str> {
    let mut rest = subject::strip_prefix(name, prefix_len);
    while let Some(shorter) = subject::MARKER_SUFFIXES
        .iter()
        .find_map(|marker| rest.strip_suffix(*marker))
    {
        rest = shorter;
    }

    rest.split("__")
        .skip(1)
        .filter(|seg| !seg.is_empty() && !KNOWN_SCOPE_SEGMENTS.contains(seg))
        .collect()
}

// ------------------------------------------------------------------------------------------------
// Decoding
// ------------------------------------------------------------------------------------------------

/// Decodes a reflected module into a tagged [`Scope`].
///
/// # Errors
///
/// [`LoadError::UnrecognizedMarker`] when `config.strict_names` is set and a
/// scope name carries an unknown marker segment. In lenient mode such names
/// are classified by their known markers only.
pub fn decode_module(module: &RawModule, config: &LoaderConfig) -> Result<Scope, LoadError> {
    let mut scope = Scope::new();
    scope.subject = module.subject.clone();

    for member in &module.members {
        if let Some(decl) = decode_member(member, config)? {
            scope.push(decl);
        }
    }

    trace!(members = module.members.len(), decoded = scope.len(), "module decoded");
    Ok(scope)
}

fn decode_member(member: &RawMember, config: &LoaderConfig) -> Result<Option<Declaration>, LoadError> {
    let prefix_len = config.synthetic_prefix_len;

    match &member.kind {
        RawKind::Class(class) => {
            if !is_scope_name(&member.name) {
                trace!(name = %member.name, "skipping non-scope class");
                return Ok(None);
            }

            let unknown = unknown_scope_segments(&member.name, prefix_len);
            if !unknown.is_empty() {
                if config.strict_names {
                    return Err(LoadError::UnrecognizedMarker {
                        name: member.name.clone(),
                    });
                }
                debug!(name = %member.name, ?unknown, "unrecognized scope markers, treating as normal");
            }

            let nested = decode_module(class, config)?;
            Ok(Some(Declaration::new(
                subject::derive(&member.name, prefix_len),
                member.order,
                scope_marker(&member.name),
                Item::Scope(nested),
            )))
        }

        RawKind::Function(body) => {
            let decl = if let Some(marker) = example_marker(&member.name, prefix_len) {
                Declaration::new(
                    subject::strip_prefix(&member.name, prefix_len),
                    member.order,
                    marker,
                    Item::Example(body.clone()),
                )
            } else if let Some(phase) =
                hook_phase(&member.name, prefix_len, &config.hook_prefixes)
            {
                Declaration::new(
                    member.name.clone(),
                    member.order,
                    Marker::Normal,
                    Item::Hook {
                        phase: phase.to_string(),
                        body: body.clone(),
                    },
                )
            } else {
                Declaration::new(
                    member.name.clone(),
                    member.order,
                    Marker::Normal,
                    Item::Helper(body.clone()),
                )
            };
            Ok(Some(decl))
        }
    }
}
