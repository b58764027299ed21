//! The process-wide "current context" slot
//!
//! The external driver-manager contract exposes lifecycle operations with no
//! per-call instance parameter, so the registry and the adapter trampolines
//! pass the acting driver's identity through this single slot. `set_current`
//! is a bare swap returning the previous value; nothing enforces that a
//! caller restores it. [`CurrentScope`] is the guard that does, on every
//! exit path including panics.

use crate::context::ExecutionContext;
use parking_lot::Mutex;
use std::sync::Arc;

static CURRENT: Mutex<Option<Arc<ExecutionContext>>> = Mutex::new(None);

/// The currently active context, if any
pub fn current() -> Option<Arc<ExecutionContext>> {
    CURRENT.lock().clone()
}

/// Swap the current context, returning the previous occupant. This is a
/// save/restore convention, not a stack.
pub fn set_current(ctx: Option<Arc<ExecutionContext>>) -> Option<Arc<ExecutionContext>> {
    std::mem::replace(&mut *CURRENT.lock(), ctx)
}

/// Scoped swap of the current context. Dropping the guard restores whatever
/// was current when it was entered.
pub struct CurrentScope {
    previous: Option<Arc<ExecutionContext>>,
}

impl CurrentScope {
    pub fn enter(ctx: Arc<ExecutionContext>) -> Self {
        Self {
            previous: set_current(Some(ctx)),
        }
    }
}

impl Drop for CurrentScope {
    fn drop(&mut self) {
        set_current(self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;
    use parking_lot::ReentrantMutex;

    // The slot under test is process-wide; serialize the tests touching it.
    static TEST_LOCK: ReentrantMutex<()> = ReentrantMutex::new(());

    #[test]
    fn test_swap_returns_previous() {
        let _guard = TEST_LOCK.lock();
        let a = ExecutionContext::new("a", None, 2);
        let b = ExecutionContext::new("b", None, 2);

        assert!(set_current(Some(a.clone())).is_none());
        let prev = set_current(Some(b)).expect("a was current");
        assert_eq!(prev.name(), "a");
        set_current(None);
    }

    #[test]
    fn test_scope_guard_restores_on_drop() {
        let _guard = TEST_LOCK.lock();
        let outer = ExecutionContext::new("outer", None, 2);
        set_current(Some(outer));

        {
            let inner = ExecutionContext::new("inner", None, 2);
            inner.set_variable("driver_id", Variable::from("led0")).unwrap();
            let _scope = CurrentScope::enter(inner);
            assert_eq!(current().unwrap().name(), "inner");
        }

        assert_eq!(current().unwrap().name(), "outer");
        set_current(None);
    }
}
