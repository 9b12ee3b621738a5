//! Unary operation evaluation

use crate::error::type_name;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

impl Evaluate for syn::ExprUnary {
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        let operand = self.expr.eval(env)?;

        match &self.op {
            syn::UnOp::Neg(_) => match operand {
                Value::I64(n) => n.checked_neg().map(Value::I64).ok_or(EvalError::TypeError {
                    message: "integer negation overflow".to_string(),
                }),
                Value::F64(n) => Ok(Value::F64(-n)),
                other => Err(EvalError::TypeError {
                    message: format!("cannot negate {}", type_name(&other)),
                }),
            },
            syn::UnOp::Not(_) => Err(EvalError::UnsupportedExpr {
                kind: "logical not".to_string(),
            }),
            syn::UnOp::Deref(_) => Err(EvalError::UnsupportedExpr {
                kind: "dereference".to_string(),
            }),
            _ => Err(EvalError::UnsupportedExpr {
                kind: "unknown unary operator".to_string(),
            }),
        }
    }
}
