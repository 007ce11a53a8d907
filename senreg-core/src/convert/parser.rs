//! Recursive-descent parser for conversion formulas
//!
//! ## Grammar
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := NUMBER
//!          | 'v'
//!          | IDENT '(' [expr (',' expr)*] ')'
//!          | '(' expr ')'
//! ```
//!
//! Binary operators are left-associative, `*` and `/` bind tighter than `+`
//! and `-`. The only free parameter is `v`; any other bare identifier is
//! rejected here rather than at evaluation. Function names are resolved
//! against the registered table while parsing, but arity is checked when the
//! call is evaluated so that a formula like `abs()` still compiles.
//!
//! Parentheses, calls and unary signs count toward a nesting cap. Flat
//! operator chains like `1 + 1 + 1` do not nest in the grammar, but each
//! operator still adds a level to the left-leaning tree, so the number of
//! binary operators per formula is capped separately. Together the two caps
//! bound the tree depth the evaluator recurses through.

use crate::errors::{ParseError, ParseErrorKind};

use super::functions::{self, Function};
use super::lexer::{tokenize, Spanned, Token};

/// Deepest nesting of parentheses, calls and unary signs
pub(crate) const MAX_DEPTH: usize = 128;

/// Most binary operators a single formula may contain
pub(crate) const MAX_OPERATORS: usize = 1024;

const PRIMARY: &str = "a number, 'v', a function call or '('";

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    /// IEEE 754 semantics: division by zero yields an infinity or NaN, not an error
    pub(crate) fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

/// Compiled expression tree
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(f64),
    Variable,
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: &'static Function,
        args: Vec<Expr>,
    },
}

/// Parse a formula into an expression tree
pub(crate) fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        operators: 0,
        end: source.len(),
    };

    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(spanned) => Err(ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: "an operator or end of formula",
                found: spanned.token.describe(),
            },
            spanned.position,
        )),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    operators: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |s| s.position)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::TooDeep(MAX_DEPTH),
                self.position(),
            ));
        }
        Ok(())
    }

    fn count_operator(&mut self, position: usize) -> Result<(), ParseError> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(ParseError::new(
                ParseErrorKind::TooManyOperators(MAX_OPERATORS),
                position,
            ));
        }
        Ok(())
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> Result<(), ParseError> {
        match self.next() {
            Some(spanned) if spanned.token == wanted => Ok(()),
            Some(spanned) => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected,
                    found: spanned.token.describe(),
                },
                spanned.position,
            )),
            None => Err(ParseError::new(ParseErrorKind::UnexpectedEnd(expected), self.end)),
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;

        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.count_operator(self.position())?;
            self.pos += 1;

            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;

        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.count_operator(self.position())?;
            self.pos += 1;

            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let negate = match self.peek_token() {
            Some(Token::Minus) => true,
            Some(Token::Plus) => false,
            _ => return self.primary(),
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.unary()?;
        self.depth -= 1;

        Ok(if negate {
            Expr::Negate(Box::new(operand))
        } else {
            operand
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let spanned = match self.next() {
            Some(spanned) => spanned,
            None => return Err(ParseError::new(ParseErrorKind::UnexpectedEnd(PRIMARY), self.end)),
        };

        match spanned.token {
            Token::Number(value) => Ok(Expr::Literal(value)),
            Token::Ident(name) => {
                if self.peek_token() == Some(&Token::LParen) {
                    let function = functions::lookup(&name).ok_or_else(|| {
                        let kind = ParseErrorKind::UnknownFunction(name.clone());
                        ParseError::new(kind, spanned.position)
                    })?;
                    self.pos += 1;
                    self.call(function)
                } else if name == "v" {
                    Ok(Expr::Variable)
                } else {
                    Err(ParseError::new(
                        ParseErrorKind::UnknownParameter(name),
                        spanned.position,
                    ))
                }
            }
            Token::LParen => {
                self.enter()?;
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            other => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: PRIMARY,
                    found: other.describe(),
                },
                spanned.position,
            )),
        }
    }

    /// Argument list after the opening parenthesis
    fn call(&mut self, function: &'static Function) -> Result<Expr, ParseError> {
        self.enter()?;
        let mut args = Vec::new();

        if self.peek_token() == Some(&Token::RParen) {
            self.pos += 1;
        } else {
            loop {
                args.push(self.expr()?);
                match self.next() {
                    Some(Spanned { token: Token::Comma, .. }) => continue,
                    Some(Spanned { token: Token::RParen, .. }) => break,
                    Some(spanned) => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken {
                                expected: "',' or ')'",
                                found: spanned.token.describe(),
                            },
                            spanned.position,
                        ))
                    }
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedEnd("',' or ')'"),
                            self.end,
                        ))
                    }
                }
            }
        }

        self.depth -= 1;
        Ok(Expr::Call { function, args })
    }
}
