//! Field access and index evaluation

use crate::error::type_name;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

impl Evaluate for syn::ExprField {
    /// Evaluate `base.field`.
    ///
    /// # Errors
    ///
    /// Returns `UndefinedField` if the object has no such key.
    /// Returns `TypeError` for tuple-style members or non-object bases.
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        let base = self.base.eval(env)?;

        match &self.member {
            syn::Member::Named(ident) => lookup_key(&base, &ident.to_string()),
            syn::Member::Unnamed(index) => Err(EvalError::TypeError {
                message: format!(
                    "cannot access field {} on {}; use [{}] for arrays",
                    index.index,
                    type_name(&base),
                    index.index
                ),
            }),
        }
    }
}

impl Evaluate for syn::ExprIndex {
    /// Evaluate `base[key]` with a string key on objects or an integer
    /// index on arrays.
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        let base = self.expr.eval(env)?;
        let index = self.index.eval(env)?;

        match (&base, &index) {
            (_, Value::String(key)) => lookup_key(&base, key),

            (Value::Array(items), Value::I64(i)) => {
                let idx = usize::try_from(*i).map_err(|_| EvalError::TypeError {
                    message: format!("negative array index {}", i),
                })?;
                items
                    .get(idx)
                    .cloned()
                    .ok_or(EvalError::IndexOutOfBounds {
                        index: idx,
                        len: items.len(),
                    })
            }

            _ => Err(EvalError::TypeError {
                message: format!(
                    "cannot index {} with {}",
                    type_name(&base),
                    type_name(&index)
                ),
            }),
        }
    }
}

/// Look up a key on an object value.
fn lookup_key(base: &Value, key: &str) -> Result<Value, EvalError> {
    match base {
        Value::Object(fields) => {
            fields
                .get(key)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedField {
                    field: key.to_string(),
                    type_name: type_name(base).to_string(),
                })
        }
        _ => Err(EvalError::TypeError {
            message: format!("cannot access field `{}` on {}", key, type_name(base)),
        }),
    }
}
