use crate::error::FormulaError;

use super::token::Token;

/// A binary arithmetic operator in a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    /// Applies the operator with plain IEEE 754 semantics. Division by zero
    /// flows through as infinity or NaN rather than failing.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::Divide => left / right,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => 1,
            BinaryOp::Multiply | BinaryOp::Divide => 2,
        }
    }
}

/// Unary minus binds tighter than any binary operator and is
/// right-associative, so stacked negations apply innermost first.
const NEGATE_PRECEDENCE: u8 = 3;

/// One entry of a formula in postfix (RPN) order.
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixToken {
    Number(f64),
    Variable(String),
    Binary(BinaryOp),
    Negate,
    Call { name: String, argc: usize },
}

/// Operator-stack entries used during conversion. A function call pushes a
/// `Call` frame followed by its `OpenParen`, so the frame always sits
/// directly beneath the parenthesis that opened it.
enum StackEntry {
    Binary(BinaryOp),
    Negate,
    OpenParen,
    Call { name: String, args_seen: usize },
}

impl StackEntry {
    /// Postfix form of an operator entry; parens and call frames have none.
    fn into_output(self) -> Option<PostfixToken> {
        match self {
            StackEntry::Binary(op) => Some(PostfixToken::Binary(op)),
            StackEntry::Negate => Some(PostfixToken::Negate),
            StackEntry::OpenParen | StackEntry::Call { .. } => None,
        }
    }
}

/// Converts a token stream to postfix order with the shunting-yard algorithm.
///
/// An identifier immediately followed by `(` becomes a function call; the
/// emitted [`PostfixToken::Call`] carries an argument count of one plus the
/// commas seen inside the call, so a zero-argument call claims one argument
/// and fails later during evaluation. A `-` at the start of the expression,
/// after an operator, after `(` or after `,` is a unary minus.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<PostfixToken>, FormulaError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();
    // True whenever the previous token cannot end an operand, which is
    // exactly where a `-` means negation.
    let mut prefix_position = true;

    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        match token {
            Token::Number(value) => {
                output.push(PostfixToken::Number(*value));
                prefix_position = false;
            }
            Token::Ident(name) => {
                if matches!(iter.peek(), Some(Token::OpenParen)) {
                    iter.next();
                    stack.push(StackEntry::Call {
                        name: name.clone(),
                        args_seen: 0,
                    });
                    stack.push(StackEntry::OpenParen);
                    prefix_position = true;
                } else {
                    output.push(PostfixToken::Variable(name.clone()));
                    prefix_position = false;
                }
            }
            Token::Minus if prefix_position => {
                // Right-associative with nothing of higher precedence above
                // it, so it never pops the stack.
                stack.push(StackEntry::Negate);
            }
            Token::Plus | Token::Minus | Token::Star | Token::Slash => {
                let op = binary_op(token);
                while stack.last().is_some_and(|top| yields_before(top, op)) {
                    if let Some(out) = stack.pop().and_then(StackEntry::into_output) {
                        output.push(out);
                    }
                }
                stack.push(StackEntry::Binary(op));
                prefix_position = true;
            }
            Token::Comma => {
                flush_to_open_paren(&mut stack, &mut output)
                    .map_err(|_| FormulaError::MisplacedComma)?;
                bump_call_args(&mut stack)?;
                prefix_position = true;
            }
            Token::OpenParen => {
                stack.push(StackEntry::OpenParen);
                prefix_position = true;
            }
            Token::CloseParen => {
                flush_to_open_paren(&mut stack, &mut output)?;
                stack.pop();
                match stack.pop() {
                    Some(StackEntry::Call { name, args_seen }) => {
                        output.push(PostfixToken::Call {
                            name,
                            argc: args_seen + 1,
                        });
                    }
                    Some(other) => stack.push(other),
                    None => {}
                }
                prefix_position = false;
            }
        }
    }

    while let Some(entry) = stack.pop() {
        match entry.into_output() {
            Some(out) => output.push(out),
            // A leftover paren or call frame means a `(` was never closed.
            None => return Err(FormulaError::MismatchedParentheses),
        }
    }

    Ok(output)
}

fn binary_op(token: &Token) -> BinaryOp {
    match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Subtract,
        Token::Star => BinaryOp::Multiply,
        _ => BinaryOp::Divide,
    }
}

/// Whether the stacked entry must be emitted before pushing `incoming`.
/// Equal precedence pops because the binary operators are left-associative.
fn yields_before(top: &StackEntry, incoming: BinaryOp) -> bool {
    match top {
        StackEntry::Negate => NEGATE_PRECEDENCE > incoming.precedence(),
        StackEntry::Binary(stacked) => stacked.precedence() >= incoming.precedence(),
        StackEntry::OpenParen | StackEntry::Call { .. } => false,
    }
}

/// Pops operators to the output until the nearest `(`, which stays on the
/// stack. Running out of stack means the parentheses never matched.
fn flush_to_open_paren(
    stack: &mut Vec<StackEntry>,
    output: &mut Vec<PostfixToken>,
) -> Result<(), FormulaError> {
    while let Some(top) = stack.last() {
        if matches!(top, StackEntry::OpenParen) {
            return Ok(());
        }
        match stack.pop().and_then(StackEntry::into_output) {
            Some(out) => output.push(out),
            None => return Err(FormulaError::MismatchedParentheses),
        }
    }
    Err(FormulaError::MismatchedParentheses)
}

/// After a comma is flushed, counts it on the call frame sitting beneath the
/// open parenthesis. A comma in plain parentheses has no frame to count on.
fn bump_call_args(stack: &mut Vec<StackEntry>) -> Result<(), FormulaError> {
    let below_paren = match stack.len().checked_sub(2) {
        Some(index) => index,
        None => return Err(FormulaError::MisplacedComma),
    };
    match stack.get_mut(below_paren) {
        Some(StackEntry::Call { args_seen, .. }) => {
            *args_seen += 1;
            Ok(())
        }
        _ => Err(FormulaError::MisplacedComma),
    }
}
