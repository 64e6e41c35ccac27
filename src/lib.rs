//! # mamba-loader
//!
//! The declaration-loading core of a behavior-driven test framework. It turns
//! nested `describe`/`context` scopes and leaf `it` examples into an ordered
//! tree of [`ExampleGroup`]s, complete with lifecycle hooks, pending and
//! focus markers, and one shared [`ExecutionContext`] per top-level group.
//!
//! ## Quick Start
//!
//! ```rust
//! use mamba_loader::{Loader, LoaderConfig, SpecBuilder};
//!
//! let mut spec = SpecBuilder::new();
//! spec.describe("a calculator", |g| {
//!     g.it("adds", |_| Ok(()));
//!     g.context("when dividing", |g| {
//!         g.only_it("rejects zero", |_| Ok(()));
//!         g.it("divides", |_| Ok(()));
//!     });
//!     g.pending_it("multiplies", |_| Ok(()));
//! });
//!
//! let loader = Loader::new(LoaderConfig::default()).unwrap();
//! let groups = loader.load(&spec.build()).unwrap();
//!
//! let root = &groups[0];
//! assert_eq!(root.name(), "a calculator");
//! // Leaves first, then nested groups.
//! assert_eq!(root.children.len(), 3);
//! assert_eq!(root.pending_count(), 2);
//! ```
//!
//! ## Ordering rules
//!
//! - Normal siblings keep declaration order; pending siblings follow them.
//! - A pending group makes everything beneath it pending.
//! - An ignore-rest (`only_`) sibling demotes every other sibling at its
//!   level to pending; with several, only the last one stays normal.
//! - A group lists its examples before its nested groups.
//!
//! ## Front ends
//!
//! - [`SpecBuilder`] registers labels and markers explicitly.
//! - [`naming::decode_module`] decodes reflected declaration files whose
//!   member names follow the `__description` / `it` / `_it` / `only_it`
//!   convention with a synthetic fixed-length prefix.

pub mod builder;
pub mod classifier;
pub mod context;
pub mod declaration;
pub mod loader;
pub mod naming;
pub mod subject;
pub mod tree;

pub use builder::{GroupBuilder, SpecBuilder};
pub use context::{Body, DuplicateHelperPolicy, ExecutionContext, Failure, Helper, SharedContext};
pub use declaration::{Declaration, Item, ItemKind, Marker, Scope};
pub use loader::Loader;
pub use naming::{RawKind, RawMember, RawModule};
pub use subject::{Subject, SubjectType};
pub use tree::{Child, Example, ExampleGroup, Hooks, Node};

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Configuration
// ------------------------------------------------------------------------------------------------

/// Upper bound for [`LoaderConfig::synthetic_prefix_len`].
pub const MAX_SYNTHETIC_PREFIX_LEN: usize = 64;

/// Configuration for a [`Loader`].
///
/// All fields have defaults matching existing declaration files via
/// [`LoaderConfig::default()`]. The configuration is validated when passed to
/// [`Loader::new`].
///
/// # Example
///
/// ```rust
/// use mamba_loader::{DuplicateHelperPolicy, LoaderConfig};
///
/// let config = LoaderConfig {
///     strict_names: true,
///     duplicate_helpers: DuplicateHelperPolicy::Reject,
///     ..LoaderConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of leading characters of a convention name that only make it
    /// unique. Dropped before classification and display.
    ///
    /// Default: 10. Must be ≤ [`MAX_SYNTHETIC_PREFIX_LEN`].
    pub synthetic_prefix_len: usize,

    /// Raw-name prefixes that mark a function as a lifecycle hook.
    ///
    /// Default: `["before", "after"]`. Must be non-empty, without empty entries.
    pub hook_prefixes: Vec<String>,

    /// Reject scope names with unrecognized `__xxx` marker segments instead
    /// of loading them as normal.
    ///
    /// Default: `false`.
    pub strict_names: bool,

    /// Handling of two helpers with the same name in one tree.
    ///
    /// Default: [`DuplicateHelperPolicy::LastWins`].
    pub duplicate_helpers: DuplicateHelperPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            synthetic_prefix_len: 10,
            hook_prefixes: vec!["before".to_string(), "after".to_string()],
            strict_names: false,
            duplicate_helpers: DuplicateHelperPolicy::LastWins,
        }
    }
}

impl LoaderConfig {
    /// Validates all configuration parameters.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.synthetic_prefix_len > MAX_SYNTHETIC_PREFIX_LEN {
            return Err(LoadError::InvalidConfig(format!(
                "synthetic_prefix_len must be <= {MAX_SYNTHETIC_PREFIX_LEN}"
            )));
        }
        if self.hook_prefixes.is_empty() {
            return Err(LoadError::InvalidConfig(
                "hook_prefixes must not be empty".into(),
            ));
        }
        if self.hook_prefixes.iter().any(String::is_empty) {
            return Err(LoadError::InvalidConfig(
                "hook_prefixes must not contain an empty prefix".into(),
            ));
        }
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Error type
// ------------------------------------------------------------------------------------------------

/// Errors returned while loading.
///
/// With the default configuration only [`LoadError::InvalidConfig`] can occur,
/// and only from [`Loader::new`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Invalid configuration parameter.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A scope name carries a marker segment the convention does not define.
    #[error("unrecognized marker in scope name `{name}`")]
    UnrecognizedMarker { name: String },

    /// Two scopes of one tree declare a helper with this name.
    #[error("helper `{name}` declared more than once in the same tree")]
    DuplicateHelper { name: String },
}
