//! Path evaluation (variable lookup)

use crate::{Environment, EvalError, Value};

use super::Evaluate;

impl Evaluate for syn::ExprPath {
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        let name = variable_name(self)?;
        env.get(&name)
            .cloned()
            .ok_or(EvalError::UndefinedVariable { name })
    }
}

/// The variable a path names, if it is a bare identifier.
pub fn variable_name(expr: &syn::ExprPath) -> Result<String, EvalError> {
    // Only bare identifiers name variables; `a::b` could only ever
    // refer to host items, which templates must not reach.
    let segment = match (expr.qself.as_ref(), expr.path.segments.len()) {
        (None, 1) => &expr.path.segments[0],
        _ => {
            return Err(EvalError::UnsupportedExpr {
                kind: format!("qualified path `{}`", path_to_string(&expr.path)),
            })
        }
    };

    let name = segment.ident.to_string();

    if !matches!(segment.arguments, syn::PathArguments::None) {
        return Err(EvalError::UnsupportedExpr {
            kind: format!("path with type arguments `{}`", name),
        });
    }

    Ok(name)
}

/// Convert a syn::Path to a string for error messages.
pub fn path_to_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}
