//! Tool registry surface
//!
//! The subsystem exposes its driver operations to the rest of the agent as
//! named JSON-in/JSON-out tools. Adapter errors arrive here as structured
//! error strings, never as panics.

use crate::error::HostError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub type ToolHandler =
    Box<dyn Fn(&serde_json::Value) -> Result<serde_json::Value, String> + Send + Sync>;

pub struct Tool {
    pub name: String,
    pub description: String,
    pub handler: ToolHandler,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler,
        }
    }
}

pub trait ToolRegistry: Send + Sync {
    fn register_tool(&self, tool: Tool) -> Result<(), HostError>;
}

/// Reference registry with an `invoke` entry point for tests and the CLI
#[derive(Default)]
pub struct InMemoryToolRegistry {
    tools: Mutex<HashMap<String, Arc<Tool>>>,
}

impl InMemoryToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a tool by name. The handler runs outside the registry lock so
    /// a tool may register or invoke other tools.
    pub fn invoke(
        &self,
        name: &str,
        params: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let tool = self
            .tools
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| format!("unknown tool `{}`", name))?;
        (tool.handler)(params)
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn register_tool(&self, tool: Tool) -> Result<(), HostError> {
        let mut tools = self.tools.lock();
        if tools.contains_key(&tool.name) {
            return Err(HostError::DuplicateTool(tool.name));
        }
        tools.insert(tool.name.clone(), Arc::new(tool));
        Ok(())
    }
}
