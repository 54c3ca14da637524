/*
 * token.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Tagliacarte, a cross-platform email client.
 *
 * Tagliacarte is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Tagliacarte is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Tagliacarte.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Header tokens and the mask that selects which kinds the tokenizer may return.

use std::borrow::Cow;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Kind of a header token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// RFC 822 atom (atext run).
    Atom,
    /// RFC 2045 token.
    Token,
    /// RFC 822 special.
    Special,
    /// RFC 2045 tspecial.
    TSpecial,
    Comment,
    QuotedString,
    DomainLiteral,
    /// One or more adjacent RFC 2047 encoded words.
    EncodedWord,
    Phrase,
    DotAtom,
}

impl TokenKind {
    pub fn mask(self) -> TokenMask {
        match self {
            TokenKind::Atom => TokenMask::ATOM,
            TokenKind::Token => TokenMask::TOKEN,
            TokenKind::Special => TokenMask::SPECIAL,
            TokenKind::TSpecial => TokenMask::TSPECIAL,
            TokenKind::Comment => TokenMask::COMMENT,
            TokenKind::QuotedString => TokenMask::QUOTED_STRING,
            TokenKind::DomainLiteral => TokenMask::DOMAIN_LITERAL,
            TokenKind::EncodedWord => TokenMask::ENCODED_WORD,
            TokenKind::Phrase => TokenMask::PHRASE,
            TokenKind::DotAtom => TokenMask::DOT_ATOM,
        }
    }
}

/// Set of token kinds a caller is prepared to accept.
///
/// Composite kinds (comment, quoted-string, domain-literal, encoded-word, phrase, dot-atom)
/// are only produced when requested; otherwise they decompose into base tokens. Base kinds
/// are always produced. Requesting `TOKEN` without `ATOM` switches to the RFC 2045 alphabet
/// (tokens and tspecials).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenMask(u16);

impl TokenMask {
    pub const NONE: TokenMask = TokenMask(0);
    pub const ATOM: TokenMask = TokenMask(0x001);
    pub const SPECIAL: TokenMask = TokenMask(0x002);
    pub const COMMENT: TokenMask = TokenMask(0x004);
    pub const QUOTED_STRING: TokenMask = TokenMask(0x008);
    pub const DOMAIN_LITERAL: TokenMask = TokenMask(0x010);
    pub const ENCODED_WORD: TokenMask = TokenMask(0x020);
    pub const PHRASE: TokenMask = TokenMask(0x040);
    pub const TOKEN: TokenMask = TokenMask(0x080);
    pub const TSPECIAL: TokenMask = TokenMask(0x100);
    pub const DOT_ATOM: TokenMask = TokenMask(0x200);
    pub const WORD: TokenMask = TokenMask(0x080 | 0x001 | 0x008);
    pub const ALL: TokenMask = TokenMask(0x3ff);

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True if every kind in `other` is in `self`.
    pub const fn contains(self, other: TokenMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: TokenMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: TokenMask) -> TokenMask {
        TokenMask(self.0 | other.0)
    }

    /// Use RFC 2045 tokens/tspecials rather than RFC 822 atoms/specials.
    pub(crate) fn mime_alphabet(self) -> bool {
        self.intersects(TokenMask::TOKEN.union(TokenMask::TSPECIAL))
            && !self.intersects(TokenMask::ATOM.union(TokenMask::SPECIAL))
    }
}

impl BitOr for TokenMask {
    type Output = TokenMask;

    fn bitor(self, rhs: TokenMask) -> TokenMask {
        self.union(rhs)
    }
}

impl BitOrAssign for TokenMask {
    fn bitor_assign(&mut self, rhs: TokenMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TokenMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenMask({:#05x})", self.0)
    }
}

/// Token payload: a slice of the source, or text decoded from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue<'a> {
    /// Zero-copy view of the input; valid only as long as the input buffer.
    Raw(&'a [u8]),
    /// Unescaped or unfolded text (quoted strings, comments, literals, phrases).
    Text(String),
    /// Decoded encoded word(s) and the charset/language declared by the first one.
    Encoded {
        text: String,
        charset: String,
        language: Option<String>,
    },
}

/// A lexical token from a structured header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    kind: TokenKind,
    value: TokenValue<'a>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, value: TokenValue<'a>) -> Self {
        Self { kind, value }
    }

    pub(crate) fn raw(kind: TokenKind, bytes: &'a [u8]) -> Self {
        Self::new(kind, TokenValue::Raw(bytes))
    }

    pub(crate) fn text(kind: TokenKind, text: String) -> Self {
        Self::new(kind, TokenValue::Text(text))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &TokenValue<'a> {
        &self.value
    }

    /// Source bytes for raw tokens.
    pub fn as_raw(&self) -> Option<&'a [u8]> {
        match self.value {
            TokenValue::Raw(b) => Some(b),
            _ => None,
        }
    }

    /// Token text; raw bytes are read as UTF-8 with ISO-8859-1 fallback.
    pub fn as_text(&self) -> Cow<'_, str> {
        match &self.value {
            TokenValue::Raw(b) => Cow::Owned(crate::mime::rfc2047::bytes_to_string(b)),
            TokenValue::Text(t) => Cow::Borrowed(t),
            TokenValue::Encoded { text, .. } => Cow::Borrowed(text),
        }
    }

    /// Charset declared by an encoded word.
    pub fn charset(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Encoded { charset, .. } => Some(charset),
            _ => None,
        }
    }

    /// True for a single-byte special or tspecial equal to `c`.
    pub fn is_special(&self, c: u8) -> bool {
        matches!(self.kind, TokenKind::Special | TokenKind::TSpecial) && self.as_raw() == Some(&[c][..])
    }
}
