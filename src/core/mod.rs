//! Synchronous client core: record store, edit mode, and form state.

/// Orchestration of store, edit mode, form, and renderer.
pub mod client;
/// Two-state edit-mode controller.
pub mod edit;
/// Form fields, chrome, and bhp validation.
pub mod form;
/// Ordered, id-unique record store.
pub mod store;
