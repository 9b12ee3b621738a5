//! Template expression evaluation
//!
//! Marker expressions are parsed with `syn` and walked here. Only a small
//! whitelist of forms is evaluated: identifiers, field access, indexing,
//! literals, negation, parentheses and `+`. Every other expression kind is
//! reported as unsupported, so a template can read its context but never
//! call into anything.

pub mod binary;
pub mod field;
pub mod literal;
pub mod path;
pub mod unary;

use quote::ToTokens;
use syn::visit::{self, Visit};

use crate::{Environment, EvalError, Value};

/// Trait for evaluating AST nodes to values.
///
/// Each supported `syn` expression type implements this trait.
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: &Environment) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for syn::Expr {
    fn eval(&self, env: &Environment) -> Result<Value, EvalError> {
        match self {
            syn::Expr::Lit(expr) => expr.eval(env),
            syn::Expr::Path(expr) => expr.eval(env),
            syn::Expr::Field(expr) => expr.eval(env),
            syn::Expr::Index(expr) => expr.eval(env),
            syn::Expr::Binary(expr) => expr.eval(env),
            syn::Expr::Unary(expr) => expr.eval(env),

            // Parenthesized and grouped expressions just unwrap
            syn::Expr::Paren(expr) => expr.expr.eval(env),
            syn::Expr::Group(expr) => expr.expr.eval(env),

            _ => Err(unsupported(self)),
        }
    }
}

/// Get a human-readable name for an expression kind.
fn expr_kind_name(expr: &syn::Expr) -> &'static str {
    match expr {
        syn::Expr::Array(_) => "array",
        syn::Expr::Assign(_) => "assignment",
        syn::Expr::Async(_) => "async block",
        syn::Expr::Await(_) => "await",
        syn::Expr::Block(_) => "block",
        syn::Expr::Break(_) => "break",
        syn::Expr::Call(_) => "function call",
        syn::Expr::Cast(_) => "cast",
        syn::Expr::Closure(_) => "closure",
        syn::Expr::Const(_) => "const block",
        syn::Expr::Continue(_) => "continue",
        syn::Expr::ForLoop(_) => "for loop",
        syn::Expr::If(_) => "if",
        syn::Expr::Let(_) => "let guard",
        syn::Expr::Loop(_) => "loop",
        syn::Expr::Macro(_) => "macro invocation",
        syn::Expr::Match(_) => "match",
        syn::Expr::MethodCall(_) => "method call",
        syn::Expr::Range(_) => "range",
        syn::Expr::Reference(_) => "reference",
        syn::Expr::Repeat(_) => "repeat",
        syn::Expr::Return(_) => "return",
        syn::Expr::Struct(_) => "struct literal",
        syn::Expr::Try(_) => "try",
        syn::Expr::TryBlock(_) => "try block",
        syn::Expr::Tuple(_) => "tuple",
        syn::Expr::Unsafe(_) => "unsafe block",
        syn::Expr::While(_) => "while",
        syn::Expr::Yield(_) => "yield",
        _ => "unknown",
    }
}

/// Build the error for an expression outside the whitelist.
fn unsupported(expr: &syn::Expr) -> EvalError {
    EvalError::UnsupportedExpr {
        kind: format!(
            "{} `{}`",
            expr_kind_name(expr),
            expr.to_token_stream()
        ),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Load-Time Check
// ═══════════════════════════════════════════════════════════════════════

/// Check that every node of an expression is one the evaluator accepts.
///
/// This catches the same forms evaluation would reject, without needing a
/// context, so templates can be checked when they load.
pub fn check_supported(expr: &syn::Expr) -> Result<(), EvalError> {
    let mut check = Whitelist { error: None };
    check.visit_expr(expr);
    check.error.map_or(Ok(()), Err)
}

struct Whitelist {
    error: Option<EvalError>,
}

impl<'ast> Visit<'ast> for Whitelist {
    fn visit_expr(&mut self, expr: &'ast syn::Expr) {
        if self.error.is_some() {
            return;
        }

        let verdict = match expr {
            syn::Expr::Lit(e) => literal::eval_lit(&e.lit).map(|_| ()),
            syn::Expr::Path(e) => path::variable_name(e).map(|_| ()),
            syn::Expr::Binary(e) if !matches!(e.op, syn::BinOp::Add(_)) => {
                Err(binary::unsupported_op(&e.op))
            }
            syn::Expr::Unary(e) if !matches!(e.op, syn::UnOp::Neg(_)) => {
                Err(EvalError::UnsupportedExpr {
                    kind: format!("unary operator `{}`", e.op.to_token_stream()),
                })
            }
            syn::Expr::Field(_)
            | syn::Expr::Index(_)
            | syn::Expr::Binary(_)
            | syn::Expr::Unary(_)
            | syn::Expr::Paren(_)
            | syn::Expr::Group(_) => Ok(()),
            _ => Err(unsupported(expr)),
        };

        match verdict {
            Ok(()) => visit::visit_expr(self, expr),
            Err(e) => self.error = Some(e),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &syn::Expr, env: &Environment) -> Result<Value, EvalError> {
    expr.eval(env)
}

/// Parse expression source text with `syn`.
pub fn parse_expr(source: &str) -> syn::Result<syn::Expr> {
    syn::parse_str(source)
}
