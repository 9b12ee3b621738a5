//! Variable bindings visible to template expressions

use crate::value::Value;

/// A single named binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,
}

/// The set of variables an expression may reference.
///
/// Bindings live in a flat vector with the most recent at the end, so a
/// later `define` of the same name shadows the earlier one.
///
/// # Example
///
/// ```
/// use arboretum::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("context", Value::from("first"));
/// env.define("context", Value::from("second"));
///
/// assert_eq!(env.get("context"), Some(&Value::from("second")));
/// assert_eq!(env.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment with `context` bound to the given value.
    ///
    /// This is the environment every template marker is evaluated in.
    pub fn with_context(context: Value) -> Self {
        let mut env = Self::new();
        env.define("context", context);
        env
    }

    /// Bind a name, shadowing any earlier binding of the same name.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.push(Binding {
            name: name.into(),
            value,
        });
    }

    /// Look up the most recent binding for a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Number of bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
