// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Tokenizer and recursive-descent parser for label expressions.
//!
//! The grammar is four tokens: `(`, `)`, a double-quoted string, and a bare
//! symbol. A symbol consisting of digits is an integer literal, digits with
//! one dot a float literal; every other symbol is a dotted field-reference
//! path. Parsing is pure: no I/O, and the same input always yields the same
//! AST or the same error.

use crate::ast::{LabelExpr, LiteralKind};
use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    LParen,
    RParen,
    Str(String),
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let bytes = input.as_bytes();
    let mut tokens = vec![];
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'(' => {
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    position: i,
                });
                i += 1;
            }
            b')' => {
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    position: i,
                });
                i += 1;
            }
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(SyntaxError::new(start, "unterminated string literal"));
                }
                tokens.push(Token {
                    kind: TokenKind::Str(input[start + 1..i].to_string()),
                    position: start,
                });
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'"') {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Symbol(input[start..i].to_string()),
                    position: start,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    input_len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<LabelExpr, SyntaxError> {
        let Some(token) = self.next() else {
            return Err(SyntaxError::new(self.input_len, "unexpected end of input"));
        };

        match token.kind {
            TokenKind::LParen => self.form(token.position),
            TokenKind::RParen => Err(SyntaxError::new(token.position, "unexpected `)`")),
            TokenKind::Str(value) => Ok(LabelExpr::Literal {
                value,
                kind: LiteralKind::Str,
            }),
            TokenKind::Symbol(symbol) => symbol_expr(&symbol, token.position),
        }
    }

    /// Parses the body of a `(op arg …)` form; the opening paren is consumed.
    fn form(&mut self, open: usize) -> Result<LabelExpr, SyntaxError> {
        let op = match self.next() {
            None => return Err(SyntaxError::new(self.input_len, "unclosed `(`")),
            Some(token) => match token.kind {
                TokenKind::RParen => {
                    return Err(SyntaxError::new(open, "empty form `()`"));
                }
                TokenKind::Symbol(symbol) => symbol,
                TokenKind::LParen | TokenKind::Str(_) => {
                    return Err(SyntaxError::new(
                        token.position,
                        "expected an operator symbol after `(`",
                    ));
                }
            },
        };

        let mut args = vec![];
        loop {
            match self.peek() {
                None => return Err(SyntaxError::new(self.input_len, "unclosed `(`")),
                Some(token) if token.kind == TokenKind::RParen => {
                    self.index += 1;
                    break;
                }
                Some(_) => args.push(self.expr()?),
            }
        }

        match op.as_str() {
            "if" if args.len() != 3 => Err(SyntaxError::new(
                open,
                format!("`if` expects 3 arguments, found {}", args.len()),
            )),
            "concat" if args.is_empty() => {
                Err(SyntaxError::new(open, "`concat` expects at least 1 argument"))
            }
            _ => Ok(LabelExpr::Call { op, args }),
        }
    }
}

fn symbol_expr(symbol: &str, position: usize) -> Result<LabelExpr, SyntaxError> {
    if symbol.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(LabelExpr::Literal {
            value: symbol.to_string(),
            kind: LiteralKind::Int,
        });
    }

    if let Some((whole, frac)) = symbol.split_once('.')
        && !whole.is_empty()
        && !frac.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Ok(LabelExpr::Literal {
            value: symbol.to_string(),
            kind: LiteralKind::Float,
        });
    }

    let path: Vec<String> = symbol.split('.').map(str::to_string).collect();
    if path.iter().any(|segment| segment.is_empty()) {
        return Err(SyntaxError::new(
            position,
            format!("malformed field path `{symbol}`"),
        ));
    }
    Ok(LabelExpr::FieldRef { path })
}

/// Parse one label expression. Trailing tokens after the root are an error.
pub fn parse(input: &str) -> Result<LabelExpr, SyntaxError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        index: 0,
        input_len: input.len(),
    };

    let expr = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(SyntaxError::new(
            extra.position,
            "unexpected tokens after expression",
        ));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_forms() {
        let expr = parse(r#"(if (upper name) "Yes" "No")"#).unwrap();
        let LabelExpr::Call { op, args } = &expr else {
            panic!("expected a call");
        };
        assert_eq!(op, "if");
        assert_eq!(args.len(), 3);
        assert_eq!(
            args[0],
            LabelExpr::Call {
                op: "upper".into(),
                args: vec![LabelExpr::FieldRef {
                    path: vec!["name".into()]
                }],
            }
        );
        assert_eq!(args[1], LabelExpr::string_literal("Yes"));
    }

    #[test]
    fn dotted_symbols_become_paths() {
        let expr = parse("(concat customer.address.city)").unwrap();
        let LabelExpr::Call { args, .. } = &expr else {
            panic!("expected a call");
        };
        assert_eq!(
            args[0],
            LabelExpr::FieldRef {
                path: vec!["customer".into(), "address".into(), "city".into()]
            }
        );
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(
            parse("(concat 42)").unwrap(),
            LabelExpr::Call {
                op: "concat".into(),
                args: vec![LabelExpr::Literal {
                    value: "42".into(),
                    kind: LiteralKind::Int
                }],
            }
        );
        assert_eq!(
            parse("(concat 1.5)").unwrap(),
            LabelExpr::Call {
                op: "concat".into(),
                args: vec![LabelExpr::Literal {
                    value: "1.5".into(),
                    kind: LiteralKind::Float
                }],
            }
        );
    }

    #[test]
    fn error_positions() {
        assert_eq!(parse("(concat name").unwrap_err().position, 12);
        assert_eq!(parse(r#"(concat "oops)"#).unwrap_err().position, 8);
        assert_eq!(parse("()").unwrap_err().position, 0);
        assert_eq!(parse("name extra").unwrap_err().position, 5);
    }

    #[test]
    fn rejects_non_symbol_operator() {
        let err = parse(r#"("concat" a)"#).unwrap_err();
        assert!(err.message.contains("operator"));
        assert_eq!(err.position, 1);
    }

    #[test]
    fn enforces_special_form_arity() {
        assert!(parse("(if a b)").unwrap_err().message.contains("`if`"));
        assert!(parse("(concat)").unwrap_err().message.contains("`concat`"));
        assert!(parse("(if a b c)").is_ok());
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(parse("(concat a..b)").is_err());
        assert!(parse("(concat .a)").is_err());
        assert!(parse("(concat a.)").is_err());
    }

    #[test]
    fn round_trips_through_pretty_printing() {
        for label in [
            r#"(concat first_name " " last_name)"#,
            r#"(if name name (concat "ID:" " " id))"#,
            r#"(concat (upper name.first) (lower name.last))"#,
            r#"(is_none attrib "Is none" "Is not none")"#,
            "(float_str price 2)",
        ] {
            let expr = parse(label).unwrap();
            let reparsed = parse(&expr.to_string()).unwrap();
            assert_eq!(expr, reparsed);
        }
    }
}
