//! Tree builder: turns a root [`Scope`] into ordered top-level
//! [`ExampleGroup`]s.
//!
//! # Construction
//!
//! 1. Top-level scopes are classified (normal first, then pending).
//! 2. Every top-level group gets a fresh [`SharedContext`]; nested groups
//!    reuse their root's handle.
//! 3. For each group, in this order:
//!    - hooks are appended per phase in declaration order,
//!    - leaf examples are classified against the group's pending flag,
//!    - nested scopes are classified and built recursively,
//!    - helpers declared in the scope are bound into the context.
//! 4. A group's children are its examples followed by its nested groups.
//!
//! Helpers of nested scopes are bound before the helpers of their parent, so
//! when duplicate names are allowed the outermost declaration of a name ends
//! up bound.
//!
//! Loading never runs a body and, with the default configuration, never
//! fails. An empty root yields an empty `Vec`.

#[cfg(test)]
mod tests;

use tracing::{debug, info, trace};

use crate::{
    LoadError, LoaderConfig,
    classifier::{self, Classified},
    context::{self, DuplicateHelper, SharedContext},
    declaration::{Declaration, Item, ItemKind, Marker, Scope},
    naming::{self, RawModule},
    subject,
    tree::{Child, Example, ExampleGroup},
};

/// Builds example-group trees from declarations.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Creates a loader after validating `config`.
    ///
    /// # Errors
    ///
    /// [`LoadError::InvalidConfig`] if any configuration field is out of range.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads every top-level scope declared in `root`.
    ///
    /// # Errors
    ///
    /// Only [`LoadError::DuplicateHelper`], when the configured policy is
    /// [`DuplicateHelperPolicy::Reject`](crate::DuplicateHelperPolicy::Reject).
    pub fn load(&self, root: &Scope) -> Result<Vec<ExampleGroup>, LoadError> {
        let scopes = root.ordered(ItemKind::Scope);
        let top_level = scopes.len();

        let classified = classifier::classify(scopes, false, |decl| decl.marker);

        let mut loaded = Vec::with_capacity(classified.len());
        for (decl, pending) in classified.into_ordered() {
            let Item::Scope(scope) = &decl.item else {
                continue;
            };

            let marker = classifier::root_marker(decl.marker, top_level);
            let nested_pending = marker == Marker::IgnoreRestAsRoot;

            let group = self.build_group(decl, scope, pending, nested_pending, SharedContext::new())?;
            loaded.push(group);
        }

        info!(
            groups = loaded.len(),
            examples = loaded.iter().map(ExampleGroup::example_count).sum::<usize>(),
            pending = loaded.iter().map(ExampleGroup::pending_count).sum::<usize>(),
            "declarations loaded"
        );
        Ok(loaded)
    }

    /// Decodes a reflected module with the naming convention, then loads it.
    ///
    /// # Errors
    ///
    /// [`LoadError::UnrecognizedMarker`] in strict mode, plus everything
    /// [`load`](Self::load) returns.
    pub fn load_module(&self, module: &RawModule) -> Result<Vec<ExampleGroup>, LoadError> {
        let scope = naming::decode_module(module, &self.config)?;
        self.load(&scope)
    }

    /// Loads several roots, concatenating their groups in input order.
    ///
    /// Each root is classified on its own: an ignore-rest scope in one root
    /// does not demote scopes of another.
    pub fn load_all<'a, I>(&self, roots: I) -> Result<Vec<ExampleGroup>, LoadError>
    where
        I: IntoIterator<Item = &'a Scope>,
    {
        let mut loaded = Vec::new();
        for root in roots {
            loaded.extend(self.load(root)?);
        }
        Ok(loaded)
    }

    // --------------------------------------------------------------------------------------------
    // Internal helpers
    // --------------------------------------------------------------------------------------------

    /// Builds one group and everything beneath it.
    ///
    /// `nested_pending` forces every nested scope pending without touching
    /// this group's own examples.
    fn build_group(
        &self,
        decl: &Declaration,
        scope: &Scope,
        pending: bool,
        nested_pending: bool,
        ctx: SharedContext,
    ) -> Result<ExampleGroup, LoadError> {
        let subject = subject::resolve(&decl.name, scope.subject.as_ref());
        let mut group = ExampleGroup::new(subject, pending, ctx.clone());

        self.load_hooks(scope, &mut group);
        let examples = self.load_examples(scope, pending);
        let nested = self.load_nested(scope, pending || nested_pending, &ctx)?;
        self.bind_helpers(scope, &ctx)?;

        group.children.reserve(examples.len() + nested.len());
        group.children.extend(examples.into_iter().map(Child::Example));
        group.children.extend(nested.into_iter().map(Child::Group));

        debug!(
            subject = %group.subject,
            pending,
            children = group.children.len(),
            hooks = group.hooks.len(),
            "example group built"
        );
        Ok(group)
    }

    fn load_hooks(&self, scope: &Scope, group: &mut ExampleGroup) {
        for decl in scope.ordered(ItemKind::Hook) {
            if let Item::Hook { phase, body } = &decl.item {
                trace!(phase = %phase, "hook registered");
                group.hooks.push(phase.clone(), body.clone());
            }
        }
    }

    fn load_examples(&self, scope: &Scope, group_pending: bool) -> Vec<Example> {
        let classified: Classified<&Declaration> =
            classifier::classify(scope.ordered(ItemKind::Example), group_pending, |d| d.marker);

        classified
            .into_ordered()
            .filter_map(|(decl, pending)| match &decl.item {
                Item::Example(body) => Some(Example::new(decl.name.clone(), body.clone(), pending)),
                _ => None,
            })
            .collect()
    }

    fn load_nested(
        &self,
        scope: &Scope,
        force_pending: bool,
        ctx: &SharedContext,
    ) -> Result<Vec<ExampleGroup>, LoadError> {
        let classified = classifier::classify(scope.ordered(ItemKind::Scope), force_pending, |d| d.marker);

        let mut nested = Vec::with_capacity(classified.len());
        for (decl, pending) in classified.into_ordered() {
            if let Item::Scope(inner) = &decl.item {
                nested.push(self.build_group(decl, inner, pending, false, ctx.clone())?);
            }
        }
        Ok(nested)
    }

    fn bind_helpers(&self, scope: &Scope, ctx: &SharedContext) -> Result<(), LoadError> {
        context::bind_helpers(scope, ctx, self.config.duplicate_helpers)
            .map(|_| ())
            .map_err(|DuplicateHelper(name)| LoadError::DuplicateHelper { name })
    }
}
