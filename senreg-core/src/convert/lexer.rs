//! Tokenizer for conversion formulas

use crate::errors::{ParseError, ParseErrorKind};

/// Formula token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl Token {
    /// Token as it reads in a diagnostic
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("'{name}'"),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

/// Token with its byte offset
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split a formula into tokens. Whitespace separates tokens and is
/// otherwise ignored.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b',' => Token::Comma,
            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let text = &source[start..pos];
                let value = text.parse::<f64>().map_err(|_| {
                    ParseError::new(ParseErrorKind::InvalidNumber(text.to_string()), start)
                })?;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    position: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len() && is_ident_byte(bytes[pos]) {
                    pos += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(source[start..pos].to_string()),
                    position: start,
                });
                continue;
            }
            _ => {
                // report the full char, not the first byte of a multi-byte one
                let ch = source[start..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(ParseError::new(ParseErrorKind::UnexpectedChar(ch), start));
            }
        };

        tokens.push(Spanned { token, position: start });
        pos += 1;
    }

    Ok(tokens)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End of a numeric literal starting at `pos`: digits, optional fraction,
/// optional exponent. Malformed literals like `1.2.3` are left for
/// `f64::from_str` to reject.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
        pos += 1;
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        // only an exponent if digits follow, otherwise `e` starts an identifier
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            pos = exp;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn tokenizes_formula() {
        assert_eq!(
            tokens("(20 * log10(abs(v)+1)) / 32767"),
            vec![
                Token::LParen,
                Token::Number(20.0),
                Token::Star,
                Token::Ident("log10".into()),
                Token::LParen,
                Token::Ident("abs".into()),
                Token::LParen,
                Token::Ident("v".into()),
                Token::RParen,
                Token::Plus,
                Token::Number(1.0),
                Token::RParen,
                Token::RParen,
                Token::Slash,
                Token::Number(32767.0),
            ]
        );
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(tokens("10.5"), vec![Token::Number(10.5)]);
        assert_eq!(tokens(".25"), vec![Token::Number(0.25)]);
        assert_eq!(tokens("1e3"), vec![Token::Number(1000.0)]);
        assert_eq!(tokens("2.5E-1"), vec![Token::Number(0.25)]);
    }

    #[test]
    fn rejects_malformed_number() {
        let err = tokenize("v * 1.2.3").unwrap_err();
        assert_eq!(err.position, 4);
        assert!(matches!(err.kind, ParseErrorKind::InvalidNumber(_)));
    }

    #[test]
    fn rejects_foreign_characters() {
        let err = tokenize("v ^ 2").unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::UnexpectedChar('^'), 2));

        let err = tokenize("v × 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('×'));
    }

    #[test]
    fn records_positions() {
        let spans = tokenize("  v+ 1").unwrap();
        let positions: Vec<_> = spans.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3, 5]);
    }
}
