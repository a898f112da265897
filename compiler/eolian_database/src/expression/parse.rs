//! Reads the canonical expression text back into a [`Tree`].

use std::{iter::Peekable, str::CharIndices, sync::Arc};

use thiserror::Error;

use super::{BinaryOperator, Literal, Tree, UnaryOperator};

/// The binding power of every prefix operator; tighter than any binary one.
const PREFIX_BINDING_POWER: u8 = 21;

/// The error returned when the text is not a well-formed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("unexpected character `{character}` at byte {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("unterminated literal starting at byte {0}")]
    UnterminatedLiteral(usize),

    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),

    #[error("character literal at byte {0} must hold exactly one character")]
    InvalidCharacter(usize),

    #[error("invalid numeric literal `{text}` at byte {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("expected {expected} at byte {offset}")]
    Expected { expected: &'static str, offset: usize },

    #[error("unexpected trailing input at byte {0}")]
    TrailingInput(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Literal(Literal),
    Binary(BinaryOperator),
    /// `-` and `+` are either binary or prefix depending on position.
    Sign(BinaryOperator),
    Prefix(UnaryOperator),
    LeftParen,
    RightParen,
    End,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

struct Lexer<'a> {
    source: &'a str,
    characters: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, characters: source.char_indices().peekable() }
    }

    fn peek(&mut self) -> Option<char> {
        self.characters.peek().map(|(_, character)| *character)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.characters.next();
            true
        } else {
            false
        }
    }

    fn position(&mut self) -> usize {
        self.characters.peek().map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.characters.next();
        }

        let Some((offset, character)) = self.characters.next() else {
            return Ok(Token {
                kind: TokenKind::End,
                offset: self.source.len(),
            });
        };

        let kind = match character {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '+' => TokenKind::Sign(BinaryOperator::Add),
            '-' => TokenKind::Sign(BinaryOperator::Sub),
            '*' => TokenKind::Binary(BinaryOperator::Mul),
            '/' => TokenKind::Binary(BinaryOperator::Div),
            '%' => TokenKind::Binary(BinaryOperator::Mod),
            '^' => TokenKind::Binary(BinaryOperator::BXor),
            '~' => TokenKind::Prefix(UnaryOperator::BNot),
            '=' if self.eat('=') => TokenKind::Binary(BinaryOperator::Eq),
            '!' if self.eat('=') => TokenKind::Binary(BinaryOperator::Nq),
            '!' => TokenKind::Prefix(UnaryOperator::Not),
            '&' if self.eat('&') => TokenKind::Binary(BinaryOperator::And),
            '&' => TokenKind::Binary(BinaryOperator::BAnd),
            '|' if self.eat('|') => TokenKind::Binary(BinaryOperator::Or),
            '|' => TokenKind::Binary(BinaryOperator::BOr),
            '<' if self.eat('<') => TokenKind::Binary(BinaryOperator::Lsh),
            '<' if self.eat('=') => TokenKind::Binary(BinaryOperator::Le),
            '<' => TokenKind::Binary(BinaryOperator::Lt),
            '>' if self.eat('>') => TokenKind::Binary(BinaryOperator::Rsh),
            '>' if self.eat('=') => TokenKind::Binary(BinaryOperator::Ge),
            '>' => TokenKind::Binary(BinaryOperator::Gt),
            '"' => TokenKind::Literal(Literal::String(Arc::from(
                self.quoted(offset, '"')?,
            ))),
            '\'' => {
                let text = self.quoted(offset, '\'')?;
                let mut characters = text.chars();

                match (characters.next(), characters.next()) {
                    (Some(character), None) => {
                        TokenKind::Literal(Literal::Char(character))
                    }
                    _ => return Err(ParseError::InvalidCharacter(offset)),
                }
            }
            character if character.is_ascii_digit() => {
                TokenKind::Literal(self.number(offset)?)
            }
            character if character.is_alphabetic() || character == '_' => {
                TokenKind::Literal(self.name(offset))
            }
            character => {
                return Err(ParseError::UnexpectedCharacter {
                    character,
                    offset,
                })
            }
        };

        Ok(Token { kind, offset })
    }

    fn quoted(
        &mut self,
        start: usize,
        quote: char,
    ) -> Result<String, ParseError> {
        let mut text = String::new();

        loop {
            let Some((offset, character)) = self.characters.next() else {
                return Err(ParseError::UnterminatedLiteral(start));
            };

            match character {
                character if character == quote => return Ok(text),
                '\\' => {
                    let escaped = match self.characters.next() {
                        Some((_, 'n')) => '\n',
                        Some((_, 't')) => '\t',
                        Some((_, 'r')) => '\r',
                        Some((_, '0')) => '\0',
                        Some((_, '\\')) => '\\',
                        Some((_, '"')) => '"',
                        Some((_, '\'')) => '\'',
                        Some(_) => {
                            return Err(ParseError::InvalidEscape(offset))
                        }
                        None => {
                            return Err(ParseError::UnterminatedLiteral(start))
                        }
                    };
                    text.push(escaped);
                }
                character => text.push(character),
            }
        }
    }

    fn name(&mut self, start: usize) -> Literal {
        loop {
            match self.peek() {
                Some(character)
                    if character.is_alphanumeric() || character == '_' =>
                {
                    self.characters.next();
                }
                // a dot continues the name only when a segment follows
                Some('.') => {
                    let mut lookahead = self.characters.clone();
                    lookahead.next();

                    if lookahead.peek().is_some_and(|(_, character)| {
                        character.is_alphabetic() || *character == '_'
                    }) {
                        self.characters.next();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        let end = self.position();
        match &self.source[start..end] {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            "null" => Literal::Null,
            name => Literal::Name(Arc::from(name)),
        }
    }

    fn digits(&mut self, radix: u32) {
        while self.peek().is_some_and(|character| character.is_digit(radix)) {
            self.characters.next();
        }
    }

    fn number(&mut self, start: usize) -> Result<Literal, ParseError> {
        let hexadecimal = self.source[start..].starts_with('0')
            && matches!(self.peek(), Some('x' | 'X'));

        let mut floating = false;
        let digits_start;

        if hexadecimal {
            self.characters.next();
            digits_start = self.position();
            self.digits(16);
        } else {
            digits_start = start;
            self.digits(10);

            if self.peek() == Some('.') {
                floating = true;
                self.characters.next();
                self.digits(10);
            }

            if matches!(self.peek(), Some('e' | 'E')) {
                floating = true;
                self.characters.next();
                if !self.eat('-') {
                    self.eat('+');
                }
                self.digits(10);
            }
        }

        let digits_end = self.position();
        while self.peek().is_some_and(char::is_alphanumeric) {
            self.characters.next();
        }
        let end = self.position();

        let invalid = || ParseError::InvalidNumber {
            text: self.source[start..end].to_owned(),
            offset: start,
        };

        let digits = &self.source[digits_start..digits_end];
        let suffix = self.source[digits_end..end].to_ascii_lowercase();

        if floating {
            return match suffix.as_str() {
                "" => {
                    digits.parse().map(Literal::Double).map_err(|_| invalid())
                }
                "f" => {
                    digits.parse().map(Literal::Float).map_err(|_| invalid())
                }
                _ => Err(invalid()),
            };
        }

        let radix = if hexadecimal { 16 } else { 10 };
        let value =
            u128::from_str_radix(digits, radix).map_err(|_| invalid())?;

        let literal = match suffix.as_str() {
            "" => i32::try_from(value)
                .map(Literal::Int)
                .or_else(|_| i64::try_from(value).map(Literal::Long))
                .or_else(|_| u64::try_from(value).map(Literal::ULong))
                .ok(),
            "u" => u32::try_from(value).ok().map(Literal::UInt),
            "l" => i64::try_from(value).ok().map(Literal::Long),
            "ul" | "lu" => u64::try_from(value).ok().map(Literal::ULong),
            "ll" => i64::try_from(value).ok().map(Literal::LLong),
            "ull" | "llu" => u64::try_from(value).ok().map(Literal::ULLong),
            _ => None,
        };

        literal.ok_or_else(invalid)
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;

        Ok(Self { lexer, current })
    }

    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Tree, ParseError> {
        let token = self.bump()?;

        let mut lhs = match token.kind {
            TokenKind::Literal(literal) => Tree::Literal(literal),
            TokenKind::Prefix(operator) => Tree::unary(
                operator,
                self.parse_expression_bp(PREFIX_BINDING_POWER)?,
            ),
            TokenKind::Sign(operator) => {
                let operator = if operator == BinaryOperator::Sub {
                    UnaryOperator::Unm
                } else {
                    UnaryOperator::Unp
                };

                Tree::unary(
                    operator,
                    self.parse_expression_bp(PREFIX_BINDING_POWER)?,
                )
            }
            TokenKind::LeftParen => {
                let inner = self.parse_expression_bp(0)?;

                if self.current.kind != TokenKind::RightParen {
                    return Err(ParseError::Expected {
                        expected: "`)`",
                        offset: self.current.offset,
                    });
                }
                self.bump()?;

                inner
            }
            TokenKind::Binary(_) | TokenKind::RightParen | TokenKind::End => {
                return Err(ParseError::Expected {
                    expected: "an expression",
                    offset: token.offset,
                })
            }
        };

        loop {
            let operator = match self.current.kind {
                TokenKind::Binary(operator) | TokenKind::Sign(operator) => {
                    operator
                }
                _ => break,
            };

            let Some((left_bp, right_bp)) = operator.binding_power() else {
                break;
            };

            if left_bp < min_bp {
                break;
            }

            self.bump()?;
            let rhs = self.parse_expression_bp(right_bp)?;

            lhs = Tree::binary(operator, lhs, rhs);
        }

        Ok(lhs)
    }
}

/// Parses the expression text into a [`Tree`].
///
/// Accepts the canonical text produced by serialization together with the
/// usual relaxations: hexadecimal integers, lowercase suffixes and
/// redundant parentheses. Binary operators are left-associative and bind
/// with C precedence.
///
/// # Errors
///
/// See [`ParseError`] for the ways the text can be rejected.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(source)?;
    let tree = parser.parse_expression_bp(0)?;

    if parser.current.kind == TokenKind::End {
        Ok(tree)
    } else {
        Err(ParseError::TrailingInput(parser.current.offset))
    }
}
