//! Ferrite execution contexts
//!
//! A context is a named, fixed-capacity variable scope with an optional
//! parent. Lookup misses recurse into the parent chain; a miss at the root
//! yields [`Variable::Null`], never an error. A single process-wide
//! "current" slot carries the acting driver's identity between the registry
//! and the adapter trampolines; the `current` module holds the save/restore
//! convention and the scoped guard that makes restoration automatic.

pub mod context;
pub mod current;
pub mod template;
pub mod variable;

pub use context::{ContextError, ExecutionContext};
pub use current::{current, set_current, CurrentScope};
pub use variable::Variable;
