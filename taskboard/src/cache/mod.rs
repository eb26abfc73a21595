//! UI-local mirrors of server state.
//!
//! Two independent caches: [`TaskListCache`] for the list view and
//! [`EditFormCache`] for the single task being edited. Neither is a source
//! of truth; both are owned by the caller and refreshed from the server.

pub mod form;
pub mod list;

pub use form::{EditFormCache, FormError, FormField, FormState, TaskDraft};
pub use list::{ListAction, TaskListCache};
