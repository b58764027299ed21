//! Hierarchical variable scopes

use crate::variable::Variable;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Scope errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// The scope is at capacity and the name is not already present.
    /// Capacity is fixed for the lifetime of the context.
    #[error("scope '{name}' is full (capacity {capacity})")]
    ScopeFull { name: String, capacity: usize },
}

/// A named, fixed-capacity variable scope with an optional parent.
///
/// Contexts hand out clones of their variables; interior mutability keeps
/// `set_variable` callable through the shared handles the current-slot
/// machinery passes around.
pub struct ExecutionContext {
    name: String,
    capacity: usize,
    vars: Mutex<Vec<(String, Variable)>>,
    parent: Option<Arc<ExecutionContext>>,
}

impl ExecutionContext {
    /// Create a scope. `capacity` bounds the number of distinct local names
    /// for the lifetime of the context.
    pub fn new(
        name: impl Into<String>,
        parent: Option<Arc<ExecutionContext>>,
        capacity: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            capacity,
            vars: Mutex::new(Vec::with_capacity(capacity)),
            parent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn parent(&self) -> Option<&Arc<ExecutionContext>> {
        self.parent.as_ref()
    }

    /// Number of locally-set variables
    pub fn len(&self) -> usize {
        self.vars.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.lock().is_empty()
    }

    /// Set a variable in the local scope only. An existing entry is
    /// replaced; a new entry fails when the scope is at capacity.
    pub fn set_variable(
        &self,
        name: impl Into<String>,
        value: Variable,
    ) -> Result<(), ContextError> {
        let name = name.into();
        let mut vars = self.vars.lock();
        if let Some(entry) = vars.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
            return Ok(());
        }
        if vars.len() >= self.capacity {
            return Err(ContextError::ScopeFull {
                name: self.name.clone(),
                capacity: self.capacity,
            });
        }
        vars.push((name, value));
        Ok(())
    }

    /// Look a variable up, walking the parent chain on a local miss. A miss
    /// at the root yields `Variable::Null`, never an error.
    pub fn get_variable(&self, name: &str) -> Variable {
        if let Some((_, value)) = self.vars.lock().iter().find(|(n, _)| n == name) {
            return value.clone();
        }
        match &self.parent {
            Some(parent) => parent.get_variable(name),
            None => Variable::Null,
        }
    }

    /// True when the name resolves somewhere along the parent chain
    pub fn has_variable(&self, name: &str) -> bool {
        if self.vars.lock().iter().any(|(n, _)| n == name) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.has_variable(name),
            None => false,
        }
    }

    /// `${name}` / `${name|default}` substitution; see [`crate::template`]
    pub fn substitute(&self, template: &str) -> String {
        crate::template::substitute(self, template)
    }
}
