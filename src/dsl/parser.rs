//! Parser for the board description language.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::{Point, Rotation};
use crate::components::ComponentKind;
use crate::error::{BoardError, Result};

/// Parser for board descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire board description.
    pub fn parse(&mut self) -> Result<BoardAst> {
        let mut ast = BoardAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                // Skip empty lines
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.placements.push(Placement::Component(component));
                }
                _ => {
                    return Err(BoardError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(BoardError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(BoardError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    /// Component names may be plain identifiers or bare numbers.
    fn expect_name(&mut self) -> Result<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Number => {
                let text = self.current.text.clone();
                self.advance()?;
                Ok(text)
            }
            _ => Err(BoardError::parse(
                self.current.line,
                format!("expected a name, got {:?}", self.current.kind),
            )),
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| BoardError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn expect_point(&mut self) -> Result<Point> {
        let x = self.expect_number()?;
        let y = self.expect_number()?;
        Ok(Point::new(x, y))
    }

    fn parse_directive(&mut self, ast: &mut BoardAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".wire" => {
                let name = self.expect_name()?;
                let start = self.expect_point()?;
                let end = self.expect_point()?;
                ast.placements.push(Placement::Wire(WireDef {
                    name,
                    start,
                    end,
                    line,
                }));
            }
            ".charge" => {
                let name = self.expect_name()?;
                let volts = self.expect_number()?;
                ast.charges.push(ChargeDef { name, volts, line });
            }
            _ => {
                return Err(BoardError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ComponentKind::from_keyword(&keyword).ok_or(BoardError::UnknownComponentKind {
            kind: keyword,
            line,
        })?;
        let name = self.expect_name()?;
        let anchor = self.expect_point()?;

        // Optional rotation in degrees
        let rotation = if self.current.kind == TokenKind::Number {
            let degrees = self.expect_number()?;
            parse_rotation(degrees).ok_or_else(|| {
                BoardError::invalid_parameter(&name, "rotation", format!("{} is not a multiple of 90", degrees))
            })?
        } else {
            Rotation::default()
        };

        let mut params = Vec::new();
        while self.current.kind == TokenKind::Identifier {
            let param = self.current.text.to_lowercase();
            self.advance()?;
            self.expect(TokenKind::Equals)?;

            let value = match self.current.kind {
                TokenKind::Number => self.expect_number()?,
                TokenKind::Identifier => {
                    let word = self.current.text.to_lowercase();
                    let value = match word.as_str() {
                        "on" | "true" | "closed" => 1.0,
                        "off" | "false" | "open" => 0.0,
                        _ => {
                            return Err(BoardError::invalid_parameter(
                                &name,
                                param,
                                format!("expected a number, got '{}'", word),
                            ))
                        }
                    };
                    self.advance()?;
                    value
                }
                _ => {
                    return Err(BoardError::parse(
                        line,
                        format!("expected value for parameter '{}'", param),
                    ))
                }
            };
            params.push((param, value));
        }

        Ok(ComponentDef {
            kind,
            name,
            anchor,
            rotation,
            params,
            line,
        })
    }
}

fn parse_rotation(degrees: f64) -> Option<Rotation> {
    if degrees.fract() != 0.0 || !degrees.is_finite() {
        return None;
    }
    Rotation::from_degrees(degrees as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    #[test]
    fn test_parse_component() {
        let ast = parse("resistor R1 3 0 180 resistance=4.7k").unwrap();
        assert_eq!(ast.placements.len(), 1);

        let Placement::Component(def) = &ast.placements[0] else {
            panic!("expected a component");
        };
        assert_eq!(def.kind, ComponentKind::Resistor);
        assert_eq!(def.name, "R1");
        assert_eq!(def.anchor, Point::new(3.0, 0.0));
        assert_eq!(def.rotation, Rotation::Deg180);
        assert_eq!(def.params, vec![("resistance".to_string(), 4700.0)]);
    }

    #[test]
    fn test_rotation_is_optional() {
        let ast = parse("SW S1 0 0 on=true").unwrap();
        let Placement::Component(def) = &ast.placements[0] else {
            panic!("expected a component");
        };
        assert_eq!(def.rotation, Rotation::Deg0);
        assert_eq!(def.params, vec![("on".to_string(), 1.0)]);
    }

    #[test]
    fn test_parse_directives() {
        let ast = parse(".wire W1 0 0 0 -3\n.charge C1 2.5\n").unwrap();
        assert!(matches!(&ast.placements[0], Placement::Wire(w) if w.end == Point::new(0.0, -3.0)));
        assert_eq!(ast.charges.len(), 1);
        assert_eq!(ast.charges[0].name, "C1");
        assert_eq!(ast.charges[0].volts, 2.5);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# A lamp\nlamp L1 0 0 ; inline comment style\n\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.placements.len(), 1);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(matches!(
            parse("diode D1 0 0"),
            Err(BoardError::UnknownComponentKind { line: 1, .. })
        ));
    }

    #[test]
    fn test_bad_rotation() {
        assert!(matches!(
            parse("battery B1 0 0 45"),
            Err(BoardError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_missing_coordinate() {
        assert!(matches!(
            parse("wire W1 0\n"),
            Err(BoardError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_directive() {
        assert!(parse(".model X").is_err());
    }
}
