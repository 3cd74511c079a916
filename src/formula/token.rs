use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::FormulaError;

/// A lexical token scanned from a formula string.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Comma,
    OpenParen,
    CloseParen,
}

/// Scans a formula left to right into a flat token list.
///
/// Identifiers are `[A-Za-z_][A-Za-z0-9_]*`, numbers are integer or decimal
/// literals, and the only punctuation is `( ) + - * / ,`. Whitespace is
/// skipped. Any other character is a hard lexical error carrying the
/// offending character and its byte position.
pub fn tokenize(formula: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = formula.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => tokens.push(scan_number(formula, &mut chars)),
            c if c.is_ascii_alphabetic() || c == '_' => {
                tokens.push(scan_ident(formula, &mut chars));
            }
            '+' => tokens.push(single(Token::Plus, &mut chars)),
            '-' => tokens.push(single(Token::Minus, &mut chars)),
            '*' => tokens.push(single(Token::Star, &mut chars)),
            '/' => tokens.push(single(Token::Slash, &mut chars)),
            ',' => tokens.push(single(Token::Comma, &mut chars)),
            '(' => tokens.push(single(Token::OpenParen, &mut chars)),
            ')' => tokens.push(single(Token::CloseParen, &mut chars)),
            _ => return Err(FormulaError::UnexpectedCharacter { ch, pos }),
        }
    }

    Ok(tokens)
}

fn single(token: Token, chars: &mut Peekable<CharIndices>) -> Token {
    chars.next();
    token
}

/// Consumes `[0-9]+` with an optional `.[0-9]+` fraction. The dot is only
/// part of the number when a digit follows it, so `3.max` lexes as `3`, `.`
/// and the `.` then fails as an unexpected character.
fn scan_number(source: &str, chars: &mut Peekable<CharIndices>) -> Token {
    let start = match chars.peek() {
        Some(&(pos, _)) => pos,
        None => source.len(),
    };
    let mut end = start;

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_ascii_digit() {
            end = pos + ch.len_utf8();
            chars.next();
        } else {
            break;
        }
    }

    if let Some(&(dot_pos, '.')) = chars.peek() {
        let mut lookahead = chars.clone();
        lookahead.next();
        if matches!(lookahead.peek(), Some(&(_, c)) if c.is_ascii_digit()) {
            chars.next();
            end = dot_pos + 1;
            while let Some(&(pos, ch)) = chars.peek() {
                if ch.is_ascii_digit() {
                    end = pos + ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }

    // The scanned slice is digits with at most one interior dot, which always
    // parses as f64.
    let value = source[start..end].parse().unwrap_or(f64::NAN);
    Token::Number(value)
}

fn scan_ident(source: &str, chars: &mut Peekable<CharIndices>) -> Token {
    let start = match chars.peek() {
        Some(&(pos, _)) => pos,
        None => source.len(),
    };
    let mut end = start;

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            end = pos + ch.len_utf8();
            chars.next();
        } else {
            break;
        }
    }

    Token::Ident(source[start..end].to_string())
}
