//! Binary operation evaluation
//!
//! `+` is the only operator templates get. It concatenates when either side
//! is a string and adds when both sides are numbers.

use quote::ToTokens;

use crate::error::type_name;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

impl Evaluate for syn::ExprBinary {
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        if !matches!(self.op, syn::BinOp::Add(_)) {
            return Err(unsupported_op(&self.op));
        }

        let left = self.left.eval(env)?;
        let right = self.right.eval(env)?;
        eval_add(left, right)
    }
}

/// Error for any binary operator other than `+`.
pub fn unsupported_op(op: &syn::BinOp) -> EvalError {
    EvalError::UnsupportedExpr {
        kind: format!("binary operator `{}`", op.to_token_stream()),
    }
}

/// Evaluate `left + right`.
pub fn eval_add(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            let mut out = left.to_text()?;
            out.push_str(&right.to_text()?);
            Ok(Value::from(out))
        }

        (Value::I64(a), Value::I64(b)) => a.checked_add(*b).map(Value::I64).ok_or(
            EvalError::TypeError {
                message: "integer overflow in addition".to_string(),
            },
        ),

        (Value::I64(a), Value::F64(b)) => Ok(Value::F64(*a as f64 + b)),
        (Value::F64(a), Value::I64(b)) => Ok(Value::F64(a + *b as f64)),
        (Value::F64(a), Value::F64(b)) => Ok(Value::F64(a + b)),

        _ => Err(EvalError::TypeError {
            message: format!(
                "cannot add {} and {}",
                type_name(&left),
                type_name(&right)
            ),
        }),
    }
}
