pub mod helpers;
mod tests_convention;
mod tests_pending;
