// SPL lexer -- tokenizer and pipeline stage splitter for SPL queries.

mod cursor;
mod stage;

use cursor::Cursor;
use spl_common::{Token, TokenKind};

pub use stage::{split_stages, Stage};

/// The SPL lexer. Converts query text into a flat stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration. Newlines are ordinary
/// whitespace: an SPL stage continues until the next top-level `|`.
/// Subsearch blocks (`[...]`) are folded into a single opaque token, so
/// every `Pipe` token in the output is a top-level stage separator.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let start = self.cursor.pos();
        let c = self.cursor.peek()?;

        let token = match c {
            '|' => self.single_char_token(TokenKind::Pipe, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),

            '=' => self.single_char_token(TokenKind::Eq, start),
            '!' => self.lex_bang(start),
            '<' => self.lex_comparison(TokenKind::Lt, TokenKind::LtEq, start),
            '>' => self.lex_comparison(TokenKind::Gt, TokenKind::GtEq, start),

            '"' | '\'' => self.lex_quoted(c, start),
            '[' => self.lex_subsearch(start),

            // Unbalanced close bracket: error recovery, consume one char.
            ']' => self.single_char_token(TokenKind::Error, start),

            _ => self.lex_word(start),
        };
        Some(token)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip whitespace, newlines included. SPL pipelines are line-agnostic.
    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(char::is_whitespace);
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `!=` is a comparison; a lone `!` is an error token.
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::NotEq, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Error, start, self.cursor.pos())
        }
    }

    fn lex_comparison(&mut self, bare: TokenKind, with_eq: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(with_eq, start, self.cursor.pos())
        } else {
            Token::new(bare, start, self.cursor.pos())
        }
    }

    /// Lex a quoted string. The span includes the quotes; backslash escapes
    /// the next character. An unterminated string becomes an error token
    /// covering the rest of the input.
    fn lex_quoted(&mut self, quote: char, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat_quoted(quote) {
            TokenKind::Quoted
        } else {
            TokenKind::Error
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// Lex a balanced `[...]` subsearch block into one opaque token.
    /// An unbalanced block becomes an error token covering the rest of
    /// the input.
    fn lex_subsearch(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat_balanced('[', ']') {
            TokenKind::Subsearch
        } else {
            TokenKind::Error
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// Lex a bare word, then classify it as an integer, a float, a function
    /// call (word immediately followed by balanced parens), or a plain word.
    fn lex_word(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_word_char);
        if self.cursor.pos() == start {
            // Not a word character at all; consume one char as an error.
            self.cursor.advance();
            return Token::new(TokenKind::Error, start, self.cursor.pos());
        }

        // `avg(duration)`: adjacency to `(` turns the word into a call token.
        if self.cursor.peek() == Some('(') {
            return self.lex_func_tail(start);
        }

        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = classify_word(text);
        Token::new(kind, start, self.cursor.pos())
    }

    /// Consume the balanced parenthesized tail of a function call token.
    fn lex_func_tail(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat_balanced('(', ')') {
            TokenKind::Func
        } else {
            TokenKind::Error
        };
        Token::new(kind, start, self.cursor.pos())
    }
}

/// Characters that may appear in a bare SPL word.
///
/// Everything except whitespace and the handful of structural characters
/// the lexer assigns meaning to. This keeps wildcards (`foo_*`), dotted
/// paths, colons, and relative time modifiers (`-7d@d`) as single words.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '|' | '[' | ']' | '(' | ')' | ',' | '=' | '!' | '<' | '>' | '"' | '\''
        )
}

/// Classify a completed word as an integer, a float, or a plain word.
fn classify_word(text: &str) -> TokenKind {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() {
        return TokenKind::Word;
    }
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        return TokenKind::Int;
    }
    let mut dot_seen = false;
    let mut digit_seen = false;
    for b in digits.bytes() {
        match b {
            b'0'..=b'9' => digit_seen = true,
            b'.' if !dot_seen => dot_seen = true,
            _ => return TokenKind::Word,
        }
    }
    if dot_seen && digit_seen {
        TokenKind::Num
    } else {
        TokenKind::Word
    }
}
