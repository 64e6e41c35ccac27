//! Explicit registration API.
//!
//! Scopes, examples, hooks and helpers register themselves in one
//! construction pass. Labels are plain strings and markers are tagged, so no
//! name decoding is involved. Declaration order is call order.
//!
//! ```rust
//! use mamba_loader::{Failure, Loader, SpecBuilder};
//!
//! let mut spec = SpecBuilder::new();
//! spec.describe("a stack", |g| {
//!     g.before_each(|ctx| {
//!         ctx.set(Vec::<i32>::new());
//!         Ok(())
//!     });
//!     g.helper("push_one", |ctx| {
//!         ctx.get_mut::<Vec<i32>>().ok_or(Failure::MissingState("Vec<i32>"))?.push(1);
//!         Ok(())
//!     });
//!     g.it("grows when pushed", |ctx| {
//!         ctx.call("push_one")?;
//!         match ctx.get::<Vec<i32>>() {
//!             Some(v) if v.len() == 1 => Ok(()),
//!             _ => Err(Failure::Assertion("expected one element".into())),
//!         }
//!     });
//!     g.pending_it("shrinks when popped", |_| Ok(()));
//! });
//!
//! let groups = Loader::default().load(&spec.build()).unwrap();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].pending_count(), 1);
//! ```


use crate::{
    context::{Body, ExecutionContext, Failure},
    declaration::{Declaration, Item, Marker, Scope},
    subject::Subject,
};

/// Builds the root [`Scope`] of a declaration file.
#[derive(Debug, Default)]
pub struct SpecBuilder {
    root: Scope,
    next_order: u32,
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a top-level group.
    pub fn describe<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::Normal, None, f)
    }

    /// Declares a top-level group loaded as pending.
    pub fn pending_describe<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::Pending, None, f)
    }

    /// Declares a focused top-level group; its siblings become pending.
    pub fn only_describe<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::IgnoreRest, None, f)
    }

    /// Declares a top-level group describing the type `T`.
    pub fn describe_type<T, F>(&mut self, f: F) -> &mut Self
    where
        T: ?Sized + 'static,
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        let subject = Subject::of::<T>();
        self.scope(subject.to_string(), Marker::Normal, Some(subject), f)
    }

    /// General form of the `describe` family.
    pub fn scope<F>(
        &mut self,
        label: impl Into<String>,
        marker: Marker,
        subject: Option<Subject>,
        f: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        let decl = build_scope(&mut self.next_order, label.into(), marker, subject, f);
        self.root.push(decl);
        self
    }

    pub fn build(self) -> Scope {
        self.root
    }
}

/// Registers members of one group. Obtained through [`SpecBuilder::describe`]
/// and friends.
#[derive(Debug)]
pub struct GroupBuilder<'a> {
    scope: Scope,
    next_order: &'a mut u32,
}

impl GroupBuilder<'_> {
    fn next(&mut self) -> u32 {
        let order = *self.next_order;
        *self.next_order += 1;
        order
    }

    fn push(&mut self, name: String, marker: Marker, item: Item) -> &mut Self {
        let order = self.next();
        self.scope.push(Declaration::new(name, order, marker, item));
        self
    }

    /// Overrides the group's subject, e.g. with [`Subject::of`].
    pub fn subject(&mut self, subject: impl Into<Subject>) -> &mut Self {
        self.scope.subject = Some(subject.into());
        self
    }

    // --------------------------------------------------------------------------------------------
    // Examples
    // --------------------------------------------------------------------------------------------

    pub fn it<F>(&mut self, label: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.example(label, Marker::Normal, body)
    }

    /// Declares an example that is loaded but not run.
    pub fn pending_it<F>(&mut self, label: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.example(label, Marker::Pending, body)
    }

    /// Declares a focused example; its siblings become pending.
    pub fn only_it<F>(&mut self, label: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.example(label, Marker::IgnoreRest, body)
    }

    pub fn example<F>(&mut self, label: impl Into<String>, marker: Marker, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.push(label.into(), marker, Item::Example(Body::new(body)))
    }

    // --------------------------------------------------------------------------------------------
    // Hooks
    // --------------------------------------------------------------------------------------------

    /// Registers a hook under `phase`. Several hooks of one phase accumulate.
    pub fn hook<F>(&mut self, phase: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        let phase = phase.into();
        let item = Item::Hook {
            phase: phase.clone(),
            body: Body::new(body),
        };
        self.push(phase, Marker::Normal, item)
    }

    pub fn before_all<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.hook("before_all", body)
    }

    pub fn before_each<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.hook("before_each", body)
    }

    pub fn after_each<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.hook("after_each", body)
    }

    pub fn after_all<F>(&mut self, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.hook("after_all", body)
    }

    // --------------------------------------------------------------------------------------------
    // Helpers
    // --------------------------------------------------------------------------------------------

    /// Declares a helper callable from any body of the tree via
    /// [`ExecutionContext::call`].
    pub fn helper<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.push(name.into(), Marker::Normal, Item::Helper(Body::new(body)))
    }

    // --------------------------------------------------------------------------------------------
    // Nested groups
    // --------------------------------------------------------------------------------------------

    pub fn context<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::Normal, None, f)
    }

    pub fn pending_context<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::Pending, None, f)
    }

    pub fn only_context<F>(&mut self, label: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        self.scope(label, Marker::IgnoreRest, None, f)
    }

    /// General form of the `context` family.
    pub fn scope<F>(
        &mut self,
        label: impl Into<String>,
        marker: Marker,
        subject: Option<Subject>,
        f: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut GroupBuilder<'_>),
    {
        let decl = build_scope(self.next_order, label.into(), marker, subject, f);
        self.scope.push(decl);
        self
    }
}

fn build_scope<F>(
    next_order: &mut u32,
    label: String,
    marker: Marker,
    subject: Option<Subject>,
    f: F,
) -> Declaration
where
    F: FnOnce(&mut GroupBuilder<'_>),
{
    let order = *next_order;
    *next_order += 1;

    let mut group = GroupBuilder {
        scope: Scope::new(),
        next_order,
    };
    if let Some(subject) = subject {
        group.scope.subject = Some(subject);
    }
    f(&mut group);

    Declaration::new(label, order, marker, Item::Scope(group.scope))
}
