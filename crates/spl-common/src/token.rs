use serde::Serialize;

use crate::span::Span;

/// A token produced by the SPL lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// Raw source text covered by this token, quotes included.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        self.span.text(source)
    }

    /// Token text with surrounding quotes stripped for quoted tokens.
    ///
    /// Every other kind returns the raw text. Escapes inside quoted
    /// strings are left as written; the analyzer never needs to unescape.
    pub fn value<'src>(&self, source: &'src str) -> &'src str {
        let text = self.text(source);
        if self.kind == TokenKind::Quoted && text.len() >= 2 {
            let bytes = text.as_bytes();
            let quote = bytes[0];
            if (quote == b'"' || quote == b'\'') && bytes[text.len() - 1] == quote {
                return &text[1..text.len() - 1];
            }
        }
        text
    }

    /// Whether this token can stand for a field name.
    ///
    /// Bare words and quoted strings qualify; numbers, operators, and
    /// opaque subsearch blocks do not.
    pub fn is_field_like(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Quoted)
    }

    /// Whether this token is a comparison operator.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }
}

/// Every kind of token the SPL lexer emits.
///
/// The vocabulary is deliberately small: SPL argument streams are mostly
/// bare words, and the grammar layer decides what a word means (field,
/// option value, aggregation call) by its position in a command pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A bare word: field names, command names, option values, wildcards.
    Word,
    /// A single- or double-quoted string, quotes included in the span.
    Quoted,
    /// An integer literal, optionally signed.
    Int,
    /// A floating-point literal, optionally signed.
    Num,
    /// A word immediately followed by a balanced parenthesized argument
    /// list with no intervening space, e.g. `avg(duration)`.
    Func,
    /// A balanced `[...]` subsearch block, treated as opaque input.
    Subsearch,
    /// `|`
    Pipe,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// Anything the lexer could not classify (error recovery).
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_strips_matching_quotes() {
        let src = r#""client ip""#;
        let tok = Token::new(TokenKind::Quoted, 0, src.len() as u32);
        assert_eq!(tok.value(src), "client ip");
    }

    #[test]
    fn value_keeps_bare_words() {
        let src = "clientip";
        let tok = Token::new(TokenKind::Word, 0, 8);
        assert_eq!(tok.value(src), "clientip");
    }

    #[test]
    fn field_like_and_comparison_predicates() {
        let word = Token::new(TokenKind::Word, 0, 1);
        let num = Token::new(TokenKind::Num, 0, 1);
        let ge = Token::new(TokenKind::GtEq, 0, 2);
        assert!(word.is_field_like());
        assert!(!num.is_field_like());
        assert!(ge.is_comparison());
        assert!(!word.is_comparison());
    }
}
