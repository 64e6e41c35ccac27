//! The executable tree handed to a runner.
//!
//! An [`ExampleGroup`] holds its leaf [`Example`]s first and its nested
//! groups after them, regardless of how they were interleaved in the
//! declaration file. Runners rely on this ordering.


use std::collections::BTreeMap;

use crate::{
    context::{Body, SharedContext},
    subject::Subject,
};

// ------------------------------------------------------------------------------------------------
// Example
// ------------------------------------------------------------------------------------------------

/// One leaf test.
#[derive(Debug, Clone)]
pub struct Example {
    pub name: String,
    pub body: Body,
    pub pending: bool,
}

impl Example {
    pub fn new(name: impl Into<String>, body: Body, pending: bool) -> Self {
        Self {
            name: name.into(),
            body,
            pending,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Hooks
// ------------------------------------------------------------------------------------------------

/// Hook bodies keyed by phase name. Bodies of one phase keep declaration order.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    phases: BTreeMap<String, Vec<Body>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `body` to `phase`; earlier bodies of the same phase are kept.
    pub fn push(&mut self, phase: impl Into<String>, body: Body) {
        self.phases.entry(phase.into()).or_default().push(body);
    }

    /// Bodies registered for `phase`, empty if none.
    pub fn get(&self, phase: &str) -> &[Body] {
        self.phases.get(phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn phases(&self) -> impl Iterator<Item = &str> {
        self.phases.keys().map(String::as_str)
    }

    /// Total number of hook bodies across all phases.
    pub fn len(&self) -> usize {
        self.phases.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// ExampleGroup
// ------------------------------------------------------------------------------------------------

/// A child of an [`ExampleGroup`].
#[derive(Debug, Clone)]
pub enum Child {
    Example(Example),
    Group(ExampleGroup),
}

impl Child {
    pub fn name(&self) -> String {
        match self {
            Self::Example(example) => example.name.clone(),
            Self::Group(group) => group.name(),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Self::Example(example) => example.pending,
            Self::Group(group) => group.pending,
        }
    }

    pub fn as_example(&self) -> Option<&Example> {
        match self {
            Self::Example(example) => Some(example),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&ExampleGroup> {
        match self {
            Self::Example(_) => None,
            Self::Group(group) => Some(group),
        }
    }
}

/// One `describe`/`context` block.
#[derive(Debug, Clone)]
pub struct ExampleGroup {
    pub subject: Subject,
    pub children: Vec<Child>,
    pub hooks: Hooks,
    pub pending: bool,

    /// Shared with every group of the same top-level tree.
    pub context: SharedContext,
}

impl ExampleGroup {
    pub fn new(subject: Subject, pending: bool, context: SharedContext) -> Self {
        Self {
            subject,
            children: Vec::new(),
            hooks: Hooks::new(),
            pending,
            context,
        }
    }

    /// Display name of the subject.
    pub fn name(&self) -> String {
        self.subject.to_string()
    }

    /// Direct leaf children.
    pub fn examples(&self) -> impl Iterator<Item = &Example> {
        self.children.iter().filter_map(Child::as_example)
    }

    /// Direct nested groups.
    pub fn groups(&self) -> impl Iterator<Item = &ExampleGroup> {
        self.children.iter().filter_map(Child::as_group)
    }

    /// Number of examples in this group and all nested groups.
    pub fn example_count(&self) -> usize {
        self.examples().count() + self.groups().map(ExampleGroup::example_count).sum::<usize>()
    }

    /// Number of pending examples in this group and all nested groups.
    pub fn pending_count(&self) -> usize {
        self.examples().filter(|e| e.pending).count()
            + self.groups().map(ExampleGroup::pending_count).sum::<usize>()
    }

    /// Depth-first, pre-order walk over this group and everything below it.
    ///
    /// Yields `(depth, node)`; this group itself is depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, Node::Group(self))],
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Walk
// ------------------------------------------------------------------------------------------------

/// Borrowed tree node yielded by [`ExampleGroup::walk`].
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Example(&'a Example),
    Group(&'a ExampleGroup),
}

impl Node<'_> {
    pub fn is_pending(&self) -> bool {
        match self {
            Self::Example(example) => example.pending,
            Self::Group(group) => group.pending,
        }
    }
}

/// Iterator returned by [`ExampleGroup::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, Node<'a>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, Node<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Node::Group(group) = node {
            for child in group.children.iter().rev() {
                let child = match child {
                    Child::Example(example) => Node::Example(example),
                    Child::Group(group) => Node::Group(group),
                };
                self.stack.push((depth + 1, child));
            }
        }
        Some((depth, node))
    }
}
