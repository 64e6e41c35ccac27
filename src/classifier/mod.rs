//! Declaration classifier: splits sibling declarations into a normal and a
//! pending bucket.
//!
//! Siblings are fed in declaration order. The result is `normal` followed by
//! `pending`, each in original relative order:
//!
//! - If the enclosing scope is pending, everything is pending.
//! - A [`Marker::IgnoreRest`] item demotes everything currently in `normal`
//!   to `pending`, becomes the only normal item, and makes every later
//!   sibling pending. A later ignore-rest item repeats this, so only the last
//!   one stays normal.
//! - A [`Marker::Pending`] item is pending.
//! - Anything else is normal.
//!
//! The same rules apply to leaves and to nested scopes, independently per
//! level.


use std::mem;

use tracing::trace;

use crate::declaration::Marker;

/// Output of a classification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<T> {
    pub normal: Vec<T>,
    pub pending: Vec<T>,
}

impl<T> Classified<T> {
    /// Final sibling order, each item paired with its pending flag.
    pub fn into_ordered(self) -> impl Iterator<Item = (T, bool)> {
        self.normal
            .into_iter()
            .map(|item| (item, false))
            .chain(self.pending.into_iter().map(|item| (item, true)))
    }

    pub fn len(&self) -> usize {
        self.normal.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.pending.is_empty()
    }
}

/// Single-pass classifier state for one level of siblings.
///
/// Items are tagged with their input position so that `finish` can restore
/// declaration order inside the pending bucket.
#[derive(Debug)]
pub struct Classifier<T> {
    inherited_pending: bool,
    ignore_rest_active: bool,
    next: usize,
    normal: Vec<(usize, T)>,
    pending: Vec<(usize, T)>,
}

impl<T> Classifier<T> {
    /// `inherited_pending` is the pending flag of the enclosing scope.
    pub fn new(inherited_pending: bool) -> Self {
        Self {
            inherited_pending,
            ignore_rest_active: false,
            next: 0,
            normal: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Feeds the next sibling in declaration order.
    pub fn push(&mut self, item: T, marker: Marker) {
        let entry = (self.next, item);
        self.next += 1;

        if self.inherited_pending {
            self.pending.push(entry);
            return;
        }

        if marker.is_ignore_rest() {
            let demoted = mem::take(&mut self.normal);
            trace!(demoted = demoted.len(), "ignore-rest marker");
            self.pending.extend(demoted);
            self.normal.push(entry);
            self.ignore_rest_active = true;
        } else if marker == Marker::Pending || self.ignore_rest_active {
            self.pending.push(entry);
        } else {
            self.normal.push(entry);
        }
    }

    /// Closes the pass. Both buckets come out in declaration order.
    pub fn finish(mut self) -> Classified<T> {
        // Demoted items were appended after already-pending ones.
        self.pending.sort_by_key(|(idx, _)| *idx);

        Classified {
            normal: self.normal.into_iter().map(|(_, item)| item).collect(),
            pending: self.pending.into_iter().map(|(_, item)| item).collect(),
        }
    }
}

/// Classifies `items` in iteration order, reading each marker with `marker_of`.
pub fn classify<T, I, F>(items: I, inherited_pending: bool, marker_of: F) -> Classified<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Marker,
{
    let mut classifier = Classifier::new(inherited_pending);
    for item in items {
        let marker = marker_of(&item);
        classifier.push(item, marker);
    }
    classifier.finish()
}

/// Marker of a top-level scope once its sibling count is known.
///
/// An ignore-rest scope that is alone at the top level becomes
/// [`Marker::IgnoreRestAsRoot`].
pub fn root_marker(marker: Marker, top_level_count: usize) -> Marker {
    match marker {
        Marker::IgnoreRest if top_level_count == 1 => Marker::IgnoreRestAsRoot,
        other => other,
    }
}
