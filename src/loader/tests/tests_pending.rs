//! Pending markers and their propagation.
//!
//! Rules tested:
//! 1. A pending leaf is listed after normal leaves and flagged pending.
//! 2. A pending nested group is flagged pending.
//! 3. A pending group forces every descendant pending, whatever its marker.

#[cfg(test)]
mod tests {
    use crate::builder::SpecBuilder;
    use crate::loader::tests::helpers::*;
    use crate::tree::Node;

    /// # Scenario
    /// Leaves `a` (normal) and `b` (pending).
    ///
    /// # Expected behavior
    /// Children `[a, b]`, `b` pending, `a` not.
    #[test]
    fn pending_leaf_is_flagged() {
        let mut spec = SpecBuilder::new();
        spec.describe("root", |g| {
            g.it("a", |_| Ok(()));
            g.pending_it("b", |_| Ok(()));
        });

        let groups = loader().load(&spec.build()).unwrap();

        assert_eq!(
            children(&groups[0]),
            vec![("a".to_string(), false), ("b".to_string(), true)]
        );
    }

    /// # Scenario
    /// A pending leaf declared before a normal one.
    ///
    /// # Expected behavior
    /// The normal leaf comes first.
    #[test]
    fn pending_leaf_moves_after_normal_leaves() {
        let mut spec = SpecBuilder::new();
        spec.describe("root", |g| {
            g.pending_it("skipped", |_| Ok(()));
            g.it("runs", |_| Ok(()));
        });

        let groups = loader().load(&spec.build()).unwrap();

        assert_eq!(
            children(&groups[0]),
            vec![("runs".to_string(), false), ("skipped".to_string(), true)]
        );
    }

    /// # Scenario
    /// A pending example plus a pending nested context.
    ///
    /// # Expected behavior
    /// Both flagged pending; the nested group's own examples are pending too.
    #[test]
    fn pending_nested_group_is_flagged() {
        let mut spec = SpecBuilder::new();
        spec.describe("root", |g| {
            g.pending_it("skipped", |_| Ok(()));
            g.pending_context("later", |g| {
                g.it("inside", |_| Ok(()));
            });
        });

        let groups = loader().load(&spec.build()).unwrap();
        let root = &groups[0];

        assert!(!root.pending);
        assert_eq!(
            children(root),
            vec![("skipped".to_string(), true), ("later".to_string(), true)]
        );
        assert_eq!(children(nested(root, 1)), vec![("inside".to_string(), true)]);
    }

    /// # Scenario
    /// The root scope itself is pending; it contains normal, focused and
    /// nested members at several depths.
    ///
    /// # Expected behavior
    /// Every node below (and including) the root reports pending.
    #[test]
    fn pending_root_forces_every_descendant() {
        let mut spec = SpecBuilder::new();
        spec.pending_describe("root", |g| {
            g.it("a", |_| Ok(()));
            g.only_it("b", |_| Ok(()));
            g.context("inner", |g| {
                g.it("c", |_| Ok(()));
                g.only_context("deeper", |g| {
                    g.only_it("d", |_| Ok(()));
                });
            });
        });

        let groups = loader().load(&spec.build()).unwrap();
        let root = &groups[0];

        assert!(root.pending);
        assert_eq!(root.example_count(), 4);
        assert_eq!(root.pending_count(), 4);
        assert!(root.walk().all(|(_, node)| node.is_pending()));
        assert_eq!(
            root.walk()
                .filter(|(_, n)| matches!(n, Node::Group(_)))
                .count(),
            3
        );
    }

    /// # Scenario
    /// A pending nested scope among normal siblings.
    ///
    /// # Expected behavior
    /// Only that subtree is pending; its siblings are unaffected.
    #[test]
    fn pending_is_scoped_to_its_subtree() {
        let mut spec = SpecBuilder::new();
        spec.describe("root", |g| {
            g.pending_context("skipped", |g| {
                g.it("x", |_| Ok(()));
            });
            g.context("runs", |g| {
                g.it("y", |_| Ok(()));
            });
        });

        let groups = loader().load(&spec.build()).unwrap();
        let root = &groups[0];

        assert_eq!(
            children(root),
            vec![("runs".to_string(), false), ("skipped".to_string(), true)]
        );
        assert_eq!(children(nested(root, 0)), vec![("y".to_string(), false)]);
        assert_eq!(children(nested(root, 1)), vec![("x".to_string(), true)]);
    }

    /// # Scenario
    /// Pending top-level scope declared before a normal one.
    ///
    /// # Expected behavior
    /// The normal group is listed first.
    #[test]
    fn pending_top_level_group_is_listed_last() {
        let mut spec = SpecBuilder::new();
        spec.pending_describe("skipped", |_| {});
        spec.describe("runs", |_| {});

        let groups = loader().load(&spec.build()).unwrap();
        let top: Vec<_> = groups.iter().map(|g| (g.name(), g.pending)).collect();

        assert_eq!(
            top,
            vec![("runs".to_string(), false), ("skipped".to_string(), true)]
        );
    }
}
