use crate::context::Body;
use crate::naming::RawModule;
use crate::tree::{Child, ExampleGroup};
use crate::{Loader, LoaderConfig};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber controlled by `RUST_LOG` env var.
/// Safe to call multiple times; only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Loader with the default configuration.
pub fn loader() -> Loader {
    init_tracing();
    Loader::new(LoaderConfig::default()).unwrap()
}

/// `(name, pending)` of every direct child.
pub fn children(group: &ExampleGroup) -> Vec<(String, bool)> {
    group
        .children
        .iter()
        .map(|c| (c.name(), c.is_pending()))
        .collect()
}

/// Names of every direct child.
pub fn names(group: &ExampleGroup) -> Vec<String> {
    group.children.iter().map(Child::name).collect()
}

/// The `index`-th child, which must be a group.
pub fn nested(group: &ExampleGroup, index: usize) -> &ExampleGroup {
    group.children[index]
        .as_group()
        .unwrap_or_else(|| panic!("child {index} of {} is not a group", group.name()))
}

// ------------------------------------------------------------------------------------------------
// Convention-named fixtures
// ------------------------------------------------------------------------------------------------

/// `_<line:09><label><markers>__description`, the name of a convention scope.
pub fn scope_name(line: u32, label: &str, markers: &str) -> String {
    format!("_{line:09}{label}{markers}__description")
}

/// `_<line:09><label>`, the name of a convention function.
pub fn fn_name(line: u32, label: &str) -> String {
    format!("_{line:09}{label}")
}

/// Adds a convention example to `module`, declared at `line`.
pub fn with_fn(module: RawModule, line: u32, label: &str) -> RawModule {
    module.function(fn_name(line, label), line, Body::noop())
}
