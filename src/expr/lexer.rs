//! Hand-written tokenizer for the expression engine.
//!
//! Grounded on `sycamore_reactive`'s habit of small, self-contained
//! hand-rolled helpers rather than reaching for a parser-combinator crate;
//! no example repo in the pack pulls in `logos`/`chumsky` for anything this
//! small, so a plain `char` scanner matches the corpus better than adding a
//! new dependency for it.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    String(String),
    Ident(String),
    True,
    False,
    Null,
    Undefined,

    Dot,
    OptionalDot, // ?.
    Comma,
    Colon,
    Semicolon,
    Question,
    QuestionQuestion, // ??
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,

    Eq,       // =
    EqEq,     // ==
    EqEqEq,   // === (treated identically to ==: engine has no loose mode)
    NotEq,    // !=
    NotEqEq,  // !==
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,  // &&
    PipePipe, // ||
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PlusPlus,
    MinusMinus,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unexpected character {ch:?} at position {pos}")]
pub struct LexError {
    pub ch: char,
    pub pos: usize,
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: std::str::CharIndices<'a>,
    peeked: Option<(usize, char)>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            chars: src.char_indices(),
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        if let Some(p) = self.peeked.take() {
            return Some(p);
        }
        self.chars.next()
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }
        self.peeked
    }

    fn peek_char(&mut self) -> Option<char> {
        self.peek().map(|(_, c)| c)
    }

    /// Tokenize the whole input eagerly; expressions embedded in attributes
    /// are short, so there is no benefit to lazy/streaming tokenization.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace();
            let Some((pos, ch)) = self.bump() else {
                out.push(Token::Eof);
                return Ok(out);
            };
            let tok = match ch {
                '.' => Token::Dot,
                ',' => Token::Comma,
                ':' => Token::Colon,
                ';' => Token::Semicolon,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '+' => self.two_char('+', Token::PlusPlus, '=', Token::PlusEq, Token::Plus),
                '-' => self.two_char('-', Token::MinusMinus, '=', Token::MinusEq, Token::Minus),
                '*' => self.one_or_eq('=', Token::StarEq, Token::Star),
                '/' => self.one_or_eq('=', Token::SlashEq, Token::Slash),
                '%' => Token::Percent,
                '?' => {
                    if self.peek_char() == Some('.') {
                        self.bump();
                        Token::OptionalDot
                    } else if self.peek_char() == Some('?') {
                        self.bump();
                        Token::QuestionQuestion
                    } else {
                        Token::Question
                    }
                }
                '!' => self.one_or_eq('=', Token::NotEq, Token::Bang),
                '=' => {
                    if self.peek_char() == Some('=') {
                        self.bump();
                        if self.peek_char() == Some('=') {
                            self.bump();
                            Token::EqEqEq
                        } else {
                            Token::EqEq
                        }
                    } else {
                        Token::Eq
                    }
                }
                '<' => self.one_or_eq('=', Token::LtEq, Token::Lt),
                '>' => self.one_or_eq('=', Token::GtEq, Token::Gt),
                '&' if self.peek_char() == Some('&') => {
                    self.bump();
                    Token::AmpAmp
                }
                '|' if self.peek_char() == Some('|') => {
                    self.bump();
                    Token::PipePipe
                }
                '\'' | '"' => self.read_string(ch)?,
                c if c.is_ascii_digit() => self.read_number(c),
                c if is_ident_start(c) => self.read_ident(c),
                _ => return Err(LexError { ch, pos }),
            };
            // `!=` already consumed its `=`; if the next char immediately
            // completes `!==`, upgrade it here for symmetry with `===`.
            let tok = if tok == Token::NotEq && self.peek_char() == Some('=') {
                self.bump();
                Token::NotEqEq
            } else {
                tok
            };
            out.push(tok);
        }
    }

    fn one_or_eq(&mut self, expect: char, if_eq: Token, otherwise: Token) -> Token {
        if self.peek_char() == Some(expect) {
            self.bump();
            if_eq
        } else {
            otherwise
        }
    }

    fn two_char(&mut self, dup: char, if_dup: Token, eq: char, if_eq: Token, otherwise: Token) -> Token {
        match self.peek_char() {
            Some(c) if c == dup => {
                self.bump();
                if_dup
            }
            Some(c) if c == eq => {
                self.bump();
                if_eq
            }
            _ => otherwise,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some((_, c)) if c == quote => return Ok(Token::String(s)),
                Some((_, '\\')) => {
                    if let Some((_, esc)) = self.bump() {
                        s.push(match esc {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    }
                }
                Some((pos, c)) => {
                    let _ = pos;
                    s.push(c);
                }
                None => return Err(LexError { ch: quote, pos: self.src.len() }),
            }
        }
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token::Number(s.parse().unwrap_or(f64::NAN))
    }

    fn read_ident(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match s.as_str() {
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            "undefined" => Token::Undefined,
            _ => Token::Ident(s),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap()
    }

    #[test]
    fn tokenizes_member_and_call() {
        assert_eq!(
            toks("count.get()"),
            vec![
                Token::Ident("count".into()),
                Token::Dot,
                Token::Ident("get".into()),
                Token::LParen,
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_compound_operators() {
        assert_eq!(
            toks("a += 1; b?.c ?? 2"),
            vec![
                Token::Ident("a".into()),
                Token::PlusEq,
                Token::Number(1.0),
                Token::Semicolon,
                Token::Ident("b".into()),
                Token::OptionalDot,
                Token::Ident("c".into()),
                Token::QuestionQuestion,
                Token::Number(2.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_strings_with_escapes() {
        assert_eq!(toks(r#"'a\'b'"#), vec![Token::String("a'b".into()), Token::Eof]);
    }

    #[test]
    fn rejects_unknown_character() {
        assert!(Lexer::new("a @ b").tokenize().is_err());
    }
}
