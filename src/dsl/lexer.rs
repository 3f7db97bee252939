//! Lexer (tokenizer) for the board description language.

use crate::error::{BoardError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the board language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier (component kind, name, parameter name)
    Identifier,
    /// A number (integer or floating point, possibly signed, possibly with suffix)
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing board descriptions.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '.' => {
                self.advance();
                let text = self.read_identifier();
                if text.is_empty() {
                    return Err(BoardError::lexer(line, column, "expected directive name after '.'"));
                }
                Ok(token(TokenKind::Directive, format!(".{}", text)))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '-' | '+' | '0'..='9' => {
                let text = self.read_number();
                if !text.chars().any(|c| c.is_ascii_digit()) {
                    return Err(BoardError::lexer(line, column, format!("malformed number '{}'", text)));
                }
                Ok(token(TokenKind::Number, text))
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                Ok(token(TokenKind::Identifier, text))
            }
            _ => Err(BoardError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        // Optional sign
        if let Some(&ch) = self.chars.peek() {
            if ch == '-' || ch == '+' {
                text.push(ch);
                self.advance();
            }
        }

        self.read_digits(&mut text);

        // Decimal part
        if let Some(&'.') = self.chars.peek() {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        // Exponent part
        if let Some(&ch) = self.chars.peek() {
            if ch == 'e' || ch == 'E' {
                text.push(ch);
                self.advance();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '-' || sign == '+' {
                        text.push(sign);
                        self.advance();
                    }
                }
                self.read_digits(&mut text);
            }
        }

        // Unit suffix (p, n, u, m, k, M, G)
        if let Some(&ch) = self.chars.peek() {
            if matches!(ch, 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G') {
                text.push(ch);
                self.advance();
            }
        }

        text
    }
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;

    let multiplier = match last {
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        _ => 1.0,
    };
    let num_str = if multiplier != 1.0 {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("100m").unwrap(), 0.1);
        assert_relative_eq!(parse_value("4.7u").unwrap(), 4.7e-6);
        assert_relative_eq!(parse_value("1M").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_value("-2.5").unwrap(), -2.5);
        assert_relative_eq!(parse_value("1e-3").unwrap(), 1e-3);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_lexer_component_line() {
        let mut lexer = Lexer::new("battery B1 0 -3 90 voltage=4.5");

        let kinds: Vec<TokenKind> = std::iter::from_fn(|| {
            let tok = lexer.next_token().unwrap();
            (tok.kind != TokenKind::Eof).then_some(tok.kind)
        })
        .collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_lexer_directive_and_position() {
        let mut lexer = Lexer::new("# header\n.wire W1 0 0 3 0");

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Newline);

        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".wire");
        assert_eq!((tok.line, tok.column), (2, 1));
    }

    #[test]
    fn test_lexer_rejects_stray_character() {
        let mut lexer = Lexer::new("R1 @");
        lexer.next_token().unwrap();
        assert!(matches!(
            lexer.next_token(),
            Err(BoardError::LexerError { line: 1, column: 4, .. })
        ));
    }
}
