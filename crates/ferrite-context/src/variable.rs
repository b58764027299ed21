//! Scope variable type
//!
//! Distinct from the VM's runtime value: contexts carry the narrower typed
//! set the configuration layer traffics in. Structured payloads are shared
//! handles; the scope never deep-copies an object graph.

use std::fmt;
use std::sync::Arc;

/// Tagged context variable
#[derive(Debug, Clone)]
pub enum Variable {
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    Object(Arc<serde_json::Value>),
    Array(Arc<serde_json::Value>),
}

impl Variable {
    pub fn is_null(&self) -> bool {
        matches!(self, Variable::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Variable::Null => "null",
            Variable::Bool(_) => "bool",
            Variable::Int(_) => "int",
            Variable::Float(_) => "float",
            Variable::Str(_) => "string",
            Variable::Object(_) => "object",
            Variable::Array(_) => "array",
        }
    }

    /// Stringify for template substitution. Floats render `%f`-style with
    /// six fractional digits; structured values render as their literal
    /// placeholders.
    pub fn render(&self) -> String {
        match self {
            Variable::Null => "null".to_string(),
            Variable::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Variable::Int(i) => i.to_string(),
            Variable::Float(x) => format!("{:.6}", x),
            Variable::Str(s) => s.clone(),
            Variable::Object(_) => "{}".to_string(),
            Variable::Array(_) => "[]".to_string(),
        }
    }

    /// String payload, when this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variable::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variable::Null, Variable::Null) => true,
            (Variable::Bool(a), Variable::Bool(b)) => a == b,
            (Variable::Int(a), Variable::Int(b)) => a == b,
            (Variable::Float(a), Variable::Float(b)) => a == b,
            (Variable::Str(a), Variable::Str(b)) => a == b,
            (Variable::Object(a), Variable::Object(b)) => a == b,
            (Variable::Array(a), Variable::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Variable {
    fn from(b: bool) -> Self {
        Variable::Bool(b)
    }
}

impl From<i32> for Variable {
    fn from(i: i32) -> Self {
        Variable::Int(i)
    }
}

impl From<f32> for Variable {
    fn from(x: f32) -> Self {
        Variable::Float(x)
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Self {
        Variable::Str(s)
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Variable::Str(s.to_string())
    }
}
