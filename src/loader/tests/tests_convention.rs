//! Loading reflected declaration files that follow the naming convention.
//!
//! Each fixture mirrors a declaration file: classes named
//! `_<line><label>[__pending|__ignore_rest]__description`, examples named
//! `_<line>it ...`, `_<line>_it ...` or `_<line>only_it ...`, hooks named
//! `before_*`/`after_*`, everything else a helper.

#[cfg(test)]
mod tests {
    use crate::context::Body;
    use crate::loader::tests::helpers::*;
    use crate::naming::RawModule;
    use crate::subject::Subject;
    use crate::{LoadError, Loader, LoaderConfig};

    fn three_examples(line: u32) -> RawModule {
        let module = with_fn(RawModule::new(), line + 1, "it first example");
        let module = with_fn(module, line + 2, "it second example");
        with_fn(module, line + 3, "it third example")
    }

    #[test]
    fn orders_examples_by_line_number() {
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, three_examples(1));

        let groups = loader().load_module(&module).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name(), "fixture");
        assert_eq!(
            names(&groups[0]),
            vec!["it first example", "it second example", "it third example"]
        );
    }

    #[test]
    fn places_examples_together_and_groups_at_the_end() {
        let inner = with_fn(RawModule::new(), 5, "it inner example");
        let body = with_fn(RawModule::new(), 2, "it first example");
        let body = with_fn(body, 3, "it second example");
        let body = body.class(scope_name(4, "#inner_context", ""), 4, inner);
        let body = with_fn(body, 7, "it third example");
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, body);

        let groups = loader().load_module(&module).unwrap();

        assert_eq!(
            names(&groups[0]),
            vec![
                "it first example",
                "it second example",
                "it third example",
                "#inner_context"
            ]
        );
    }

    #[test]
    fn pending_example_and_pending_group() {
        let body = with_fn(RawModule::new(), 2, "_it pending example");
        let body = body.class(
            scope_name(3, "pending context", "__pending"),
            3,
            with_fn(RawModule::new(), 4, "it inside"),
        );
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, body);

        let groups = loader().load_module(&module).unwrap();
        let root = &groups[0];

        assert_eq!(
            children(root),
            vec![
                ("_it pending example".to_string(), true),
                ("pending context".to_string(), true),
            ]
        );
    }

    #[test]
    fn pending_root_marks_everything_inside() {
        let body = with_fn(RawModule::new(), 2, "it example");
        let body = body.class(
            scope_name(3, "context", ""),
            3,
            with_fn(RawModule::new(), 4, "it inner example"),
        );
        let module = RawModule::new().class(scope_name(1, "fixture", "__pending"), 1, body);

        let groups = loader().load_module(&module).unwrap();
        let root = &groups[0];

        assert!(root.pending);
        assert_eq!(
            children(root),
            vec![("it example".to_string(), true), ("context".to_string(), true)]
        );
        assert_eq!(children(nested(root, 1)), vec![("it inner example".to_string(), true)]);
    }

    #[test]
    fn ignore_rest_example() {
        let body = with_fn(RawModule::new(), 2, "it first");
        let body = with_fn(body, 3, "only_it focused");
        let body = with_fn(body, 4, "it third");
        let body = with_fn(body, 5, "it fourth");
        let module = RawModule::new().class(
            scope_name(1, "fixture", ""),
            1,
            RawModule::new().class(scope_name(1, "context", ""), 1, body),
        );

        let groups = loader().load_module(&module).unwrap();
        let context = nested(&groups[0], 0);

        assert_eq!(
            children(context),
            vec![
                ("only_it focused".to_string(), false),
                ("it first".to_string(), true),
                ("it third".to_string(), true),
                ("it fourth".to_string(), true),
            ]
        );
    }

    #[test]
    fn multiple_ignore_rest_examples_keep_last() {
        let body = with_fn(RawModule::new(), 2, "it a");
        let body = with_fn(body, 3, "only_it first focus");
        let body = with_fn(body, 4, "it b");
        let body = with_fn(body, 5, "only_it second focus");
        let body = with_fn(body, 6, "it c");
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, body);

        let groups = loader().load_module(&module).unwrap();
        let flags: Vec<_> = groups[0].children.iter().map(|c| c.is_pending()).collect();

        assert_eq!(names(&groups[0])[0], "only_it second focus");
        assert_eq!(flags, vec![false, true, true, true, true]);
    }

    #[test]
    fn ignore_rest_contexts() {
        let body = RawModule::new()
            .class(scope_name(2, "first", ""), 2, RawModule::new())
            .class(scope_name(3, "second", "__ignore_rest"), 3, RawModule::new())
            .class(scope_name(4, "third", ""), 4, RawModule::new());
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, body);

        let groups = loader().load_module(&module).unwrap();

        assert_eq!(
            children(&groups[0]),
            vec![
                ("second".to_string(), false),
                ("first".to_string(), true),
                ("third".to_string(), true),
            ]
        );
    }

    #[test]
    fn hooks_helpers_and_explicit_subject() {
        struct Stack;
        let body = RawModule::new()
            .with_subject(Subject::of::<Stack>())
            .function("before_each", 2, Body::noop())
            .function("before_each", 3, Body::noop())
            .function("after_all", 4, Body::noop())
            .function("build", 5, Body::noop());
        let body = with_fn(body, 6, "it works");
        let module = RawModule::new()
            .class(scope_name(1, "ignored label", ""), 1, body)
            .class("HelperClass", 9, RawModule::new());

        let groups = loader().load_module(&module).unwrap();
        let root = &groups[0];

        assert_eq!(groups.len(), 1);
        assert_eq!(root.subject, Subject::of::<Stack>());
        assert_eq!(root.hooks.get("before_each").len(), 2);
        assert_eq!(root.hooks.get("after_all").len(), 1);
        assert_eq!(names(root), vec!["it works"]);
        assert!(root.context.with(|ctx| ctx.has_helper("build")).unwrap());
        assert!(!root.context.with(|ctx| ctx.has_helper("before_each")).unwrap());
    }

    #[test]
    fn prefixed_hooks_register_under_bare_phase() {
        let body = RawModule::new()
            .function("before_each", 2, Body::noop())
            .function(fn_name(3, "before_each"), 3, Body::noop())
            .function(fn_name(4, "after_all"), 4, Body::noop());
        let body = with_fn(body, 5, "it works");
        let module = RawModule::new().class(scope_name(1, "fixture", ""), 1, body);

        let groups = loader().load_module(&module).unwrap();
        let root = &groups[0];

        assert_eq!(root.hooks.get("before_each").len(), 2);
        assert_eq!(root.hooks.get("after_all").len(), 1);
        assert_eq!(root.hooks.phases().collect::<Vec<_>>(), vec!["after_all", "before_each"]);
        assert!(root.context.with(|ctx| ctx.helper_names().is_empty()).unwrap());
    }

    #[test]
    fn unrecognized_marker_loads_as_normal() {
        let module = RawModule::new().class(
            scope_name(1, "fixture", "__focus"),
            1,
            with_fn(RawModule::new(), 2, "it runs"),
        );

        let groups = loader().load_module(&module).unwrap();

        assert!(!groups[0].pending);
        assert_eq!(children(&groups[0]), vec![("it runs".to_string(), false)]);
    }

    #[test]
    fn unrecognized_marker_rejected_in_strict_mode() {
        let module = RawModule::new().class(scope_name(1, "fixture", "__focus"), 1, RawModule::new());
        let loader = Loader::new(LoaderConfig {
            strict_names: true,
            ..LoaderConfig::default()
        })
        .unwrap();

        assert!(matches!(
            loader.load_module(&module),
            Err(LoadError::UnrecognizedMarker { .. })
        ));
    }

    #[test]
    fn module_without_scopes_is_empty() {
        let module = RawModule::new()
            .class("HelperClass", 1, RawModule::new())
            .function("helper", 2, Body::noop());

        assert!(loader().load_module(&module).unwrap().is_empty());
    }
}
