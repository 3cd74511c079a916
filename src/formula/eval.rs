use ahash::AHashMap;

use crate::error::FormulaError;

use super::postfix::PostfixToken;

/// Folds a postfix token stream over a value stack.
///
/// Binary operators pop the right operand first, then the left. After the
/// last token exactly one value must remain on the stack; anything else means
/// the expression was unbalanced.
pub fn evaluate_postfix(
    tokens: &[PostfixToken],
    variables: &AHashMap<String, f64>,
) -> Result<f64, FormulaError> {
    let mut stack: Vec<f64> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            PostfixToken::Number(value) => stack.push(*value),
            PostfixToken::Variable(name) => {
                let value = variables
                    .get(name)
                    .copied()
                    .ok_or_else(|| FormulaError::UnknownVariable(name.clone()))?;
                stack.push(value);
            }
            PostfixToken::Binary(op) => {
                let right = stack.pop().ok_or_else(|| missing(op.symbol()))?;
                let left = stack.pop().ok_or_else(|| missing(op.symbol()))?;
                stack.push(op.apply(left, right));
            }
            PostfixToken::Negate => {
                let value = stack.pop().ok_or_else(|| missing("-"))?;
                stack.push(-value);
            }
            PostfixToken::Call { name, argc } => {
                let split = stack
                    .len()
                    .checked_sub(*argc)
                    .ok_or_else(|| missing(name))?;
                let args = stack.split_off(split);
                stack.push(apply_function(name, &args)?);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(FormulaError::UnbalancedExpression),
    }
}

/// Applies a builtin call-style function to its arguments, given in source
/// order. Every builtin takes one or more arguments; the converter guarantees
/// at least one by construction.
fn apply_function(name: &str, args: &[f64]) -> Result<f64, FormulaError> {
    match name {
        "sum" => Ok(args.iter().sum()),
        "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        _ => Err(FormulaError::UnknownFunction(name.to_string())),
    }
}

fn missing(symbol: &str) -> FormulaError {
    FormulaError::MissingOperands {
        symbol: symbol.to_string(),
    }
}
