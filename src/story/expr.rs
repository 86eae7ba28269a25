//! Arithmetic evaluation for variable mutations.
//!
//! Grammar (whitespace ignored):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits*] | '.' digits
//! ```
//!
//! Nothing else is accepted; there is no identifier, call or assignment syntax.

use std::sync::LazyLock;

use logos::Logos;
use regex::Regex;

use crate::{Result, StoryflowError};

/// Characters an arithmetic mutation may consist of.
const ARITHMETIC_PATTERN: &str = r"^[\d\s+\-*/()%.]+$";

/// Maximum parenthesis nesting accepted by the parser.
const MAX_NESTING: usize = 64;

static ARITHMETIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ARITHMETIC_PATTERN).unwrap());

/// Whether `text` only contains arithmetic characters and is worth evaluating.
pub fn is_arithmetic(text: &str) -> bool {
    ARITHMETIC_RE.is_match(text)
}

/// Evaluates an arithmetic expression. Non-finite results are errors.
pub fn evaluate(text: &str) -> Result<f64> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(StoryflowError::Expression(format!("unexpected token at position {} in '{}'", parser.pos, text)));
    }
    if !value.is_finite() {
        return Err(StoryflowError::Expression(format!("'{}' does not evaluate to a finite number", text)));
    }
    Ok(value)
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"\s+")]
enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Num(f64),
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    // increment operators, rejected rather than read as two signs
    #[token("++")]
    #[token("--")]
    Step,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut lex = Token::lexer(text);
    let mut tokens = Vec::new();

    while let Some(token) = lex.next() {
        match token {
            Ok(Token::Step) => return Err(StoryflowError::Expression(format!("invalid operator '{}'", lex.slice()))),
            Ok(token) => tokens.push(token),
            Err(()) => return Err(StoryflowError::Expression(format!("unexpected input '{}' at {} in '{}'", lex.slice(), lex.span().start, text))),
        }
    }

    if tokens.is_empty() {
        return Err(StoryflowError::Expression("empty expression".to_string()));
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::Percent)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value * rhs,
                Token::Slash => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(|p| p.unary())
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.nested(|p| p.unary()).map(|v| -v)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64> {
        match self.advance() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.nested(|p| p.expr())?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(StoryflowError::Expression("missing closing parenthesis".to_string())),
                }
            }
            Some(token) => Err(StoryflowError::Expression(format!("unexpected token {:?}", token))),
            None => Err(StoryflowError::Expression("unexpected end of expression".to_string())),
        }
    }

    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<f64>,
    ) -> Result<f64> {
        if self.depth >= MAX_NESTING {
            return Err(StoryflowError::Expression("expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let value = f(self);
        self.depth -= 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_arithmetic() {
        assert!(is_arithmetic("5+10"));
        assert!(is_arithmetic(" (1.5 * 2) % 3 "));
        assert!(!is_arithmetic("5+x"));
        assert!(!is_arithmetic(""));
        assert!(!is_arithmetic("alert(1)"));
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("5+10").unwrap(), 15.0);
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate("(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluate("10-4-3").unwrap(), 3.0);
        assert_eq!(evaluate("100/10/2").unwrap(), 5.0);
        assert_eq!(evaluate("7 % 4").unwrap(), 3.0);
        assert_eq!(evaluate("-7 % 4").unwrap(), -3.0);
        assert_eq!(evaluate("1/4").unwrap(), 0.25);
    }

    #[test]
    fn test_numbers_and_signs() {
        assert_eq!(evaluate(".5 + 5.").unwrap(), 5.5);
        assert_eq!(evaluate("-(-3)").unwrap(), 3.0);
        assert_eq!(evaluate("- -3").unwrap(), 3.0);
        assert_eq!(evaluate("+-2").unwrap(), -2.0);
        assert_eq!(evaluate("3 - -2").unwrap(), 5.0);
    }

    #[test]
    fn test_malformed_expressions() {
        for text in ["", "   ", "1.2.3", ".", "5 5", "2(3)", "(1+2", "1+2)", "*3", "4/", "--5", "1++2", "()"] {
            assert!(evaluate(text).is_err(), "'{}' should not evaluate", text);
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize(" 1.5*( 2 -.5)% 3 ").unwrap(),
            vec![Token::Num(1.5), Token::Star, Token::LParen, Token::Num(2.0), Token::Minus, Token::Num(0.5), Token::RParen, Token::Percent, Token::Num(3.0)]
        );
        assert_eq!(tokenize("- -3").unwrap(), vec![Token::Minus, Token::Minus, Token::Num(3.0)]);
        assert!(tokenize("2--1").is_err());
        assert!(tokenize("1 + x").is_err());
        assert!(tokenize("\t").is_err());
    }

    #[test]
    fn test_non_finite_results_fail() {
        assert!(evaluate("1/0").is_err());
        assert!(evaluate("0/0").is_err());
        assert!(evaluate("5 % 0").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(evaluate(&deep).is_err());
        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
    }
}
