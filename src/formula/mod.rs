//! The arithmetic expression language used by `calc` nodes.
//!
//! Expressions combine numeric literals, caller-bound identifiers, the
//! operators `+ - * /` with standard precedence, unary minus, parentheses and
//! the variadic builtins `sum(...)`, `min(...)` and `max(...)`. Evaluation is
//! a pure three-stage pipeline: tokenize, convert to postfix with the
//! shunting-yard algorithm, then fold the postfix stream over a value stack.

mod eval;
mod postfix;
mod token;

use ahash::AHashMap;

use crate::error::FormulaError;

/// Evaluates a formula against a set of variable bindings.
///
/// # Arguments
///
/// * `formula`: The expression text, e.g. `"sum(salary, bonus) - rent"`.
/// * `variables`: Scalar bindings for every identifier the formula uses.
///
/// # Returns
///
/// The numeric result, or a [`FormulaError`] describing the first problem
/// found: malformed syntax, an unbound variable or an unsupported function.
/// Division follows IEEE 754, so dividing by zero yields an infinity or NaN
/// instead of an error.
///
/// # Example
///
/// ```rust
/// use ahash::AHashMap;
///
/// let mut vars = AHashMap::new();
/// vars.insert("x".to_string(), 5.0);
///
/// assert_eq!(kakeibo::formula::evaluate("2 + 3 * 4", &vars), Ok(14.0));
/// assert_eq!(kakeibo::formula::evaluate("-x", &vars), Ok(-5.0));
/// assert_eq!(kakeibo::formula::evaluate("sum(1, 2, 3) * x", &vars), Ok(30.0));
/// ```
pub fn evaluate(formula: &str, variables: &AHashMap<String, f64>) -> Result<f64, FormulaError> {
    let tokens = token::tokenize(formula)?;
    let postfix = postfix::to_postfix(&tokens)?;
    eval::evaluate_postfix(&postfix, variables)
}
