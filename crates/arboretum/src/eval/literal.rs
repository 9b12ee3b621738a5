//! Literal evaluation

use crate::{Environment, EvalError, Value};

use super::Evaluate;

impl Evaluate for syn::ExprLit {
    fn eval(&self, _env: &Environment) -> Result<Value, EvalError> {
        eval_lit(&self.lit)
    }
}

/// Evaluate a literal to a Value.
///
/// Characters become one-character strings; there is no separate char type
/// in rendered output.
pub fn eval_lit(lit: &syn::Lit) -> Result<Value, EvalError> {
    match lit {
        syn::Lit::Str(s) => Ok(Value::string(s.value())),

        syn::Lit::Char(c) => Ok(Value::string(c.value().to_string())),

        syn::Lit::Int(i) => i
            .base10_parse::<i64>()
            .map(Value::I64)
            .map_err(|_| EvalError::TypeError {
                message: format!("integer literal `{}` out of range", i),
            }),

        syn::Lit::Float(f) => f
            .base10_parse::<f64>()
            .map(Value::F64)
            .map_err(|_| EvalError::TypeError {
                message: format!("invalid float literal `{}`", f),
            }),

        syn::Lit::Bool(b) => Ok(Value::Bool(b.value())),

        syn::Lit::ByteStr(_) => Err(EvalError::UnsupportedLiteral {
            kind: "byte string literal".to_string(),
        }),

        syn::Lit::Byte(_) => Err(EvalError::UnsupportedLiteral {
            kind: "byte literal".to_string(),
        }),

        _ => Err(EvalError::UnsupportedLiteral {
            kind: "unknown literal".to_string(),
        }),
    }
}
