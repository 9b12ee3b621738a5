//! HTML templates with interpolated expressions
//!
//! A template is plain text with markers of the form `<%- expr %>`. Each
//! marker is replaced by the text of its expression, evaluated in an
//! environment where the serialized render context is bound as `context`.
//!
//! # Architecture
//!
//! ```text
//! file text → [parse] → Template { TemplateNode* }
//!                              │
//! context → Value ─────────────┴→ [render] → String
//! ```
//!
//! Expressions are checked for syntax and for unsupported forms when the
//! template is parsed, so a typo or a method call in a template stops the
//! server at startup. Evaluation goes through
//! [`crate::eval`], which only understands data lookups and `+`.
//!
//! # Example
//!
//! ```
//! use arboretum::TemplateStore;
//! use serde_json::json;
//!
//! let mut store = TemplateStore::new();
//! store.insert("hello.html", "<h1><%- context.name %></h1>").unwrap();
//!
//! let html = store.render("hello.html", &json!({"name": "Oak"})).unwrap();
//! assert_eq!(html, "<h1>Oak</h1>");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::TemplateError;
use crate::eval::{check_supported, eval_expr, parse_expr};
use crate::{Environment, Value};

/// Opening marker of an interpolated expression
pub const OPEN_MARKER: &str = "<%-";

/// Closing marker of an interpolated expression
pub const CLOSE_MARKER: &str = "%>";

/// A node in a parsed template.
#[derive(Clone, PartialEq)]
pub enum TemplateNode {
    /// Text copied to the output as-is
    Text(String),

    /// Expression source whose evaluated text is substituted
    Interpolate(String),
}

impl fmt::Debug for TemplateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateNode::Text(text) => write!(f, "Text({:?})", text),
            TemplateNode::Interpolate(expr) => write!(f, "Interpolate({})", expr),
        }
    }
}

/// A parsed template.
#[derive(Clone, Debug)]
pub struct Template {
    /// Template name (its filename)
    pub name: String,

    /// Raw template text as loaded
    pub source: String,

    /// Text and expression nodes in order
    pub nodes: Vec<TemplateNode>,
}

impl Template {
    /// Parse template text, validating the syntax of every expression.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Syntax` for an unterminated or empty marker,
    /// or an expression that does not parse, and `TemplateError::Eval` for
    /// an expression using a form the evaluator rejects.
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self, TemplateError> {
        let name = name.into();
        let source = source.into();
        let mut nodes = Vec::new();
        let mut rest = source.as_str();

        while let Some(start) = rest.find(OPEN_MARKER) {
            if start > 0 {
                nodes.push(TemplateNode::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN_MARKER.len()..];
            let end = after_open
                .find(CLOSE_MARKER)
                .ok_or_else(|| TemplateError::Syntax {
                    template: name.clone(),
                    message: format!(
                        "unterminated `{}` at byte {}",
                        OPEN_MARKER,
                        source.len() - rest.len() + start
                    ),
                })?;

            let expr = after_open[..end].trim();
            if expr.is_empty() {
                return Err(TemplateError::Syntax {
                    template: name,
                    message: "empty expression marker".to_string(),
                });
            }
            let parsed = parse_expr(expr).map_err(|e| TemplateError::Syntax {
                template: name.clone(),
                message: format!("invalid expression `{}`: {}", expr, e),
            })?;
            check_supported(&parsed).map_err(|source| TemplateError::Eval {
                template: name.clone(),
                expr: expr.to_string(),
                source,
            })?;
            nodes.push(TemplateNode::Interpolate(expr.to_string()));

            rest = &after_open[end + CLOSE_MARKER.len()..];
        }

        if !rest.is_empty() {
            nodes.push(TemplateNode::Text(rest.to_string()));
        }

        Ok(Self {
            name,
            source,
            nodes,
        })
    }

    /// Render against an already-converted context value.
    pub fn render_value(&self, context: Value) -> Result<String, TemplateError> {
        let env = Environment::with_context(context);
        let mut out = String::with_capacity(self.source.len());

        for node in &self.nodes {
            match node {
                TemplateNode::Text(text) => out.push_str(text),
                TemplateNode::Interpolate(src) => {
                    let text = parse_expr(src)
                        .map_err(|e| TemplateError::Syntax {
                            template: self.name.clone(),
                            message: e.to_string(),
                        })
                        .and_then(|expr| {
                            eval_expr(&expr, &env)
                                .and_then(|value| value.to_text())
                                .map_err(|source| TemplateError::Eval {
                                    template: self.name.clone(),
                                    expr: src.clone(),
                                    source,
                                })
                        })?;
                    out.push_str(&text);
                }
            }
        }

        Ok(out)
    }

    /// Number of interpolation markers.
    pub fn marker_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TemplateNode::Interpolate(_)))
            .count()
    }
}

/// All templates known to the server, keyed by filename.
#[derive(Clone, Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Template>,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every regular file in `dir` as a template.
    ///
    /// Runs once at startup; any failure is meant to halt the process.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let io_err = |path: &Path, source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut store = Self::new();
        for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let entry = entry.map_err(|e| io_err(dir, e))?;
            let path = entry.path();
            if !entry.file_type().map_err(|e| io_err(path.as_path(), e))?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let text = fs::read_to_string(&path).map_err(|e| io_err(path.as_path(), e))?;
            store.insert(name, text)?;
        }

        debug!(dir = %dir.display(), count = store.len(), "loaded templates");
        Ok(store)
    }

    /// Parse and add a template, replacing any template of the same name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let template = Template::parse(name, source)?;
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template against a serializable context.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown template, `Context` if the context
    /// does not serialize, and `Eval` if any marker fails.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        name: &str,
        context: &T,
    ) -> Result<String, TemplateError> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render_value(Value::from_serialize(context)?)
    }

    /// Get all template names.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
