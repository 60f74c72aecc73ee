//! Lexer for whilelang.

use std::fmt;

use crate::error::CoreError;
use crate::grammar::Dialect;

/// Kind of a token produced by the lexer.
///
/// Identifier and number tokens carry their value; every other kind is
/// fully described by its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Var,
    While,
    If,
    Else,

    // Identifiers and literals
    Ident(String),
    Number(i32),

    // Arithmetic and assignment
    Plus,   // +
    Minus,  // -
    Star,   // *
    Assign, // =

    // Relational
    Gt,  // >
    Lt,  // <
    Gte, // >=
    Lte, // <=
    Eq,  // ==
    Neq, // !=

    // Punctuation
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Semi,   // ;

    // Special
    Eof,
}

impl TokenKind {
    /// Upper-case tag used in diagnostics and token listings.
    pub fn tag(&self) -> &'static str {
        match self {
            TokenKind::Var => "VAR",
            TokenKind::While => "WHILE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Ident(_) => "IDENT",
            TokenKind::Number(_) => "NUMBER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Gt => "GT",
            TokenKind::Lt => "LT",
            TokenKind::Gte => "GTE",
            TokenKind::Lte => "LTE",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semi => "SEMI",
            TokenKind::Eof => "EOF",
        }
    }

    /// Source text of the token, if it has one.
    pub fn lexeme(&self) -> Option<String> {
        let text = match self {
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Ident(name) => return Some(name.clone()),
            TokenKind::Number(value) => return Some(value.to_string()),
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Assign => "=",
            TokenKind::Gt => ">",
            TokenKind::Lt => "<",
            TokenKind::Gte => ">=",
            TokenKind::Lte => "<=",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semi => ";",
            TokenKind::Eof => return None,
        };
        Some(text.to_string())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(text) => write!(f, "{} '{}'", self.tag(), text),
            None => f.write_str(self.tag()),
        }
    }
}

/// A single token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Lex a source string in the full dialect.
pub fn lex(source: &str) -> Result<Vec<Token>, CoreError> {
    lex_dialect(source, Dialect::Full)
}

/// Lex a source string into tokens. The result always ends with `Eof`.
///
/// Stops at the first character that cannot start a token.
pub fn lex_dialect(source: &str, dialect: Dialect) -> Result<Vec<Token>, CoreError> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        index: 0,
        dialect,
    };
    lexer.run()
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    index: usize,
    dialect: Dialect,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> Result<Vec<Token>, CoreError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_whitespace() {
                self.consume_char();
                continue;
            }

            let start = self.index;
            let kind = match ch {
                b'+' => self.single(TokenKind::Plus),
                b'-' => self.single(TokenKind::Minus),
                b'*' => self.single(TokenKind::Star),
                b';' => self.single(TokenKind::Semi),
                b'(' => self.single(TokenKind::LParen),
                b')' => self.single(TokenKind::RParen),
                b'{' => self.single(TokenKind::LBrace),
                b'}' => self.single(TokenKind::RBrace),
                b'=' => self.with_equals(TokenKind::Eq, TokenKind::Assign),
                b'>' => self.with_equals(TokenKind::Gte, TokenKind::Gt),
                b'<' => self.with_equals(TokenKind::Lte, TokenKind::Lt),
                b'!' => {
                    if self.peek_next() == Some(b'=') {
                        self.consume_char();
                        self.consume_char();
                        TokenKind::Neq
                    } else {
                        return Err(self.unexpected_char(start));
                    }
                }
                b'0'..=b'9' => self.lex_number(start)?,
                _ if is_ident_char(ch) => self.lex_ident_or_keyword(start),
                _ => return Err(self.unexpected_char(start)),
            };

            tokens.push(Token {
                kind,
                position: start,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            position: self.bytes.len(),
        });
        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.consume_char();
        kind
    }

    /// `=`, `>` and `<` become their two-character form when followed by `=`.
    fn with_equals(&mut self, long: TokenKind, short: TokenKind) -> TokenKind {
        self.consume_char();
        if self.peek_char() == Some(b'=') {
            self.consume_char();
            long
        } else {
            short
        }
    }

    fn unexpected_char(&self, start: usize) -> CoreError {
        let character = self.source[start..].chars().next().unwrap_or('\0');
        CoreError::Lex {
            position: start,
            character,
        }
    }

    fn lex_number(&mut self, start: usize) -> Result<TokenKind, CoreError> {
        while matches!(self.peek_char(), Some(b'0'..=b'9')) {
            self.consume_char();
        }
        let text = &self.source[start..self.index];
        // Only overflow can fail here; the slice is all ASCII digits.
        let value = text.parse::<i32>().map_err(|_| CoreError::NumberOutOfRange {
            position: start,
            literal: text.to_string(),
        })?;
        Ok(TokenKind::Number(value))
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> TokenKind {
        while self.peek_char().is_some_and(is_ident_char) {
            self.consume_char();
        }

        let text = &self.source[start..self.index];
        match text {
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "if" if self.dialect.has_conditionals() => TokenKind::If,
            "else" if self.dialect.has_conditionals() => TokenKind::Else,
            _ => TokenKind::Ident(text.to_string()),
        }
    }

    fn peek_char(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.bytes.len() {
            self.index += 1;
        }
    }
}

/// Identifiers are letters and underscores only; digits end an identifier.
fn is_ident_char(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}
