//! Display and interpolation text for Value

use std::fmt;

use super::*;
use crate::error::EvalError;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "{}", serde_json::Value::from(self)),
        }
    }
}

impl Value {
    /// The text a template marker produces for this value.
    ///
    /// Objects have no sensible inline form, so interpolating one (directly
    /// or inside an array) is an error rather than a JSON dump in the page.
    pub fn to_text(&self) -> Result<String, EvalError> {
        match self {
            Value::Object(_) => Err(EvalError::TypeError {
                message: "cannot interpolate an object".to_string(),
            }),
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(Value::to_text)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parts.join(","))
            }
            other => Ok(other.to_string()),
        }
    }
}
