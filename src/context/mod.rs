//! # Execution Context
//!
//! A single mutable object shared by every hook and example body of one
//! top-level example group.
//!
//! Helpers declared anywhere in a tree are bound into the context by name
//! while the tree is loaded. At run time a body receives `&mut
//! ExecutionContext` and can invoke any bound helper through
//! [`ExecutionContext::call`]; the helper observes and mutates the same
//! state the body sees.
//!
//! ## Sharing
//!
//! The context is owned through a [`SharedContext`] handle
//! (`Arc<RwLock<ExecutionContext>>`). Nested groups clone the handle of their
//! root, so state written by an outer `before` hook is visible to examples of
//! inner groups.
//!
//! ## Concurrency
//!
//! Loading only writes helpers, and does so from one thread. A runner that
//! executes examples of one tree in parallel serializes on the lock; sibling
//! examples still observe each other's state, so such a runner should clone
//! the tree per worker instead.

// ------------------------------------------------------------------------------------------------
// Unit tests
// ------------------------------------------------------------------------------------------------


// ------------------------------------------------------------------------------------------------
// Includes
// ------------------------------------------------------------------------------------------------

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use thiserror::Error;
use tracing::{trace, warn};

use crate::declaration::{Item, Scope};

// ------------------------------------------------------------------------------------------------
// Body types
// ------------------------------------------------------------------------------------------------

/// Signature shared by example bodies, hook bodies and helpers.
pub type BodyFn = dyn Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync;

/// A callable executed against the shared [`ExecutionContext`].
///
/// Cloning is cheap: the closure itself is reference counted.
#[derive(Clone)]
pub struct Body(Arc<BodyFn>);

impl Body {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A body that does nothing and always succeeds.
    pub fn noop() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Invokes the body with `ctx` as its receiver.
    pub fn call(&self, ctx: &mut ExecutionContext) -> Result<(), Failure> {
        (self.0)(ctx)
    }

    /// Returns `true` if both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Body) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Body(..)")
    }
}

/// Helpers use the same calling convention as bodies.
pub type Helper = Body;

// ------------------------------------------------------------------------------------------------
// Failure
// ------------------------------------------------------------------------------------------------

/// A failure raised while running a body. Never produced during loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Failure {
    /// An expectation inside an example body did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A body called a helper that no scope of the tree declared.
    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    /// A body read state that no hook or helper stored.
    #[error("missing state of type {0}")]
    MissingState(&'static str),

    /// A previous body panicked while holding the context lock.
    #[error("execution context poisoned")]
    Poisoned,
}

// ------------------------------------------------------------------------------------------------
// Duplicate policy
// ------------------------------------------------------------------------------------------------

/// What to do when two scopes of one tree declare a helper with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateHelperPolicy {
    /// The helper bound last replaces the earlier one.
    #[default]
    LastWins,

    /// Loading fails with [`LoadError::DuplicateHelper`](crate::LoadError::DuplicateHelper).
    Reject,
}

// ------------------------------------------------------------------------------------------------
// ExecutionContext
// ------------------------------------------------------------------------------------------------

/// Named helpers plus a typed state store.
#[derive(Default)]
pub struct ExecutionContext {
    /// Helpers keyed by the name they were declared with.
    helpers: HashMap<String, Helper>,

    /// One value per Rust type, written by hooks and helpers.
    state: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.helpers.keys().collect();
        names.sort();
        f.debug_struct("ExecutionContext")
            .field("helpers", &names)
            .field("state_entries", &self.state.len())
            .finish()
    }
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `helper` under `name`, returning the helper it replaced.
    pub fn bind(&mut self, name: impl Into<String>, helper: Helper) -> Option<Helper> {
        self.helpers.insert(name.into(), helper)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Names of all bound helpers, sorted.
    pub fn helper_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.helpers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invokes the helper bound under `name` against this context.
    ///
    /// # Errors
    ///
    /// [`Failure::UnknownHelper`] if nothing is bound under `name`; otherwise
    /// whatever the helper returns.
    pub fn call(&mut self, name: &str) -> Result<(), Failure> {
        let helper = self
            .helpers
            .get(name)
            .cloned()
            .ok_or_else(|| Failure::UnknownHelper(name.to_string()))?;
        trace!(helper = name, "calling helper");
        helper.call(self)
    }

    /// Stores `value`, replacing any previous value of the same type.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
        self.state.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.state
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.state
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Like [`get`](Self::get), but reports absence as a [`Failure`] so bodies can use `?`.
    pub fn expect_state<T: Any + Send + Sync>(&self) -> Result<&T, Failure> {
        self.get::<T>()
            .ok_or(Failure::MissingState(type_name::<T>()))
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.state
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.state.contains_key(&TypeId::of::<T>())
    }

    /// Drops all stored state. Bound helpers are kept.
    pub fn clear_state(&mut self) {
        self.state.clear();
    }
}

// ------------------------------------------------------------------------------------------------
// SharedContext
// ------------------------------------------------------------------------------------------------

/// Reference-counted handle to the context of one top-level tree.
#[derive(Clone, Default)]
pub struct SharedContext {
    inner: Arc<RwLock<ExecutionContext>>,
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.read() {
            Ok(ctx) => fmt::Debug::fmt(&*ctx, f),
            Err(_) => f.write_str("SharedContext(<poisoned>)"),
        }
    }
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if both handles refer to the same context instance.
    pub fn ptr_eq(&self, other: &SharedContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `body` with exclusive access to the context.
    pub fn run(&self, body: &Body) -> Result<(), Failure> {
        let mut ctx = self.inner.write().map_err(|_| Failure::Poisoned)?;
        body.call(&mut *ctx)
    }

    /// Invokes a bound helper by name.
    pub fn call(&self, name: &str) -> Result<(), Failure> {
        let mut ctx = self.inner.write().map_err(|_| Failure::Poisoned)?;
        ctx.call(name)
    }

    /// Read access for inspection outside of a body.
    pub fn with<R>(&self, f: impl FnOnce(&ExecutionContext) -> R) -> Result<R, Failure> {
        let ctx = self.inner.read().map_err(|_| Failure::Poisoned)?;
        Ok(f(&*ctx))
    }

    /// Write access for inspection outside of a body.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ExecutionContext) -> R) -> Result<R, Failure> {
        let mut ctx = self.inner.write().map_err(|_| Failure::Poisoned)?;
        Ok(f(&mut *ctx))
    }
}

// ------------------------------------------------------------------------------------------------
// Binder
// ------------------------------------------------------------------------------------------------

/// Binds every helper declared directly in `scope` into `ctx`.
///
/// Hooks, examples and nested scopes are skipped. With
/// [`DuplicateHelperPolicy::LastWins`] a helper whose name is already bound
/// replaces the earlier one; with [`DuplicateHelperPolicy::Reject`] the first
/// such name is returned as `Err` and the context is left untouched for it.
pub(crate) fn bind_helpers(
    scope: &Scope,
    ctx: &SharedContext,
    policy: DuplicateHelperPolicy,
) -> Result<usize, DuplicateHelper> {
    let mut guard = ctx
        .inner
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut bound = 0;
    for decl in scope.declarations() {
        let Item::Helper(helper) = &decl.item else {
            continue;
        };

        if guard.has_helper(&decl.name) {
            match policy {
                DuplicateHelperPolicy::Reject => {
                    return Err(DuplicateHelper(decl.name.clone()));
                }
                DuplicateHelperPolicy::LastWins => {
                    warn!(helper = %decl.name, "helper already bound, replacing");
                }
            }
        }

        guard.bind(decl.name.clone(), helper.clone());
        bound += 1;
    }

    trace!(bound, "helpers bound");
    Ok(bound)
}

/// Name of a helper rejected by [`DuplicateHelperPolicy::Reject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DuplicateHelper(pub String);
