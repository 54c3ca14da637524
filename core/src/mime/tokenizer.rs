/*
 * tokenizer.rs
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

//! CFWS-aware lexer for structured header values.
//!
//! Layers RFC 822 atoms and specials, RFC 2045 tokens and tspecials, RFC 2047 encoded words
//! and RFC 2822 dot-atoms over one cursor. Lookahead is bounded to one token (plus a peek
//! across whitespace when joining adjacent encoded words), so scanning is linear.
//!
//! Folding: a line break followed by SP or HT is whitespace. With `crlf` set only CRLF folds
//! and a lone CR or LF is an unexpected byte; without it every CR and LF between tokens is
//! treated as whitespace.

use crate::cursor::ReadCursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::rfc2047::{bytes_to_string, parse_encoded_word};
use crate::mime::token::{Token, TokenKind, TokenMask, TokenValue};
use crate::mime::utils::{fold_len, is_atext, is_special, is_token_char, is_tspecial, is_wsp, trailing_break_len};

/// Text accumulator for comments: raw bytes interleaved with decoded encoded words.
/// Whitespace that only separates two encoded words is dropped.
#[derive(Default)]
struct TextBuf {
    text: String,
    raw: Vec<u8>,
    after_word: bool,
}

impl TextBuf {
    fn push_byte(&mut self, b: u8) {
        self.raw.push(b);
    }

    fn push_word(&mut self, word: &str) {
        if self.after_word && self.raw.iter().all(|&b| is_wsp(b)) {
            self.raw.clear();
        }
        self.flush_raw();
        self.text.push_str(word);
        self.after_word = true;
    }

    fn flush_raw(&mut self) {
        if !self.raw.is_empty() {
            self.text.push_str(&bytes_to_string(&self.raw));
            self.raw.clear();
        }
    }

    fn finish(mut self) -> String {
        self.flush_raw();
        self.text
    }
}

/// Structured header tokenizer over a byte slice.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    cursor: ReadCursor<'a>,
    crlf: bool,
    /// Inside a quoted-string that `next_token` is handing out piece by piece.
    in_quote: bool,
    /// The previous piece was a backslash inside such a quoted-string.
    quote_escape: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8], crlf: bool) -> Self {
        Self::from_cursor(ReadCursor::new(input), crlf)
    }

    pub fn from_cursor(cursor: ReadCursor<'a>, crlf: bool) -> Self {
        Self {
            cursor,
            crlf,
            in_quote: false,
            quote_escape: false,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn cursor(&self) -> &ReadCursor<'a> {
        &self.cursor
    }

    pub fn into_cursor(self) -> ReadCursor<'a> {
        self.cursor
    }

    pub fn is_crlf(&self) -> bool {
        self.crlf
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn peek(&self) -> Option<u8> {
        self.cursor.peek()
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a [u8] {
        self.cursor.rest()
    }

    pub(crate) fn bump(&mut self) {
        self.cursor.advance(1);
    }

    /// Backtrack to a position returned by [`Tokenizer::position`].
    pub fn reset(&mut self, pos: usize) {
        self.cursor.set_position(pos);
        self.in_quote = false;
        self.quote_escape = false;
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.cursor.position())
    }

    pub(crate) fn take_while(&mut self, pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        self.cursor.take_while(pred)
    }

    /// Consume `c` if it is next.
    pub(crate) fn eat(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skip spaces, tabs and folds. Returns true if anything was skipped.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.cursor.position();
        while let Some(b) = self.peek() {
            if is_wsp(b) {
                self.bump();
                continue;
            }
            if b == b'\r' || b == b'\n' {
                let n = if self.crlf {
                    fold_len(&self.cursor, true).max(trailing_break_len(&self.cursor, true))
                } else {
                    1
                };
                if n > 0 {
                    self.cursor.advance(n);
                    continue;
                }
            }
            break;
        }
        self.cursor.position() != start
    }

    /// Skip comments and folding whitespace. Fails on an unbalanced comment, leaving the
    /// cursor on its opening parenthesis.
    pub fn skip_cfws(&mut self) -> Result<bool, ParseError> {
        let start = self.cursor.position();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(b'(') {
                self.comment(false)?;
            } else {
                break;
            }
        }
        Ok(self.cursor.position() != start)
    }

    /// Parse a comment at the cursor and return its text without the outer parentheses.
    /// Nested comments keep their parentheses; encoded words are decoded.
    pub fn parse_comment(&mut self) -> Result<String, ParseError> {
        self.comment(true)
    }

    fn comment(&mut self, save: bool) -> Result<String, ParseError> {
        let open = self.cursor.position();
        if !self.eat(b'(') {
            return Err(self.error(ParseErrorKind::UnexpectedByte));
        }
        let mut depth = 1usize;
        let mut buf = TextBuf::default();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.unterminated_comment(open));
            };
            match b {
                b'\\' => {
                    self.bump();
                    match self.cursor.next_byte() {
                        Some(x) if save => buf.push_byte(x),
                        Some(_) => {}
                        None => return Err(self.unterminated_comment(open)),
                    }
                }
                b'(' => {
                    depth += 1;
                    if save {
                        buf.push_byte(b);
                    }
                    self.bump();
                }
                b')' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    if save {
                        buf.push_byte(b);
                    }
                }
                b'\r' | b'\n' if fold_len(&self.cursor, self.crlf) > 0 => {
                    let n = fold_len(&self.cursor, self.crlf);
                    self.cursor.advance(n);
                }
                b'=' if save && self.cursor.peek_at(1) == Some(b'?') => match parse_encoded_word(&mut self.cursor) {
                    Some(word) => buf.push_word(&word.text()),
                    None => {
                        buf.push_byte(b);
                        self.bump();
                    }
                },
                _ => {
                    if save {
                        buf.push_byte(b);
                    }
                    self.bump();
                }
            }
        }
        Ok(buf.finish())
    }

    fn unterminated_comment(&mut self, open: usize) -> ParseError {
        self.reset(open);
        ParseError::new(ParseErrorKind::UnterminatedComment, open)
    }

    /// Parse a quoted-string at the cursor; returns the unescaped, unfolded content.
    pub fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        self.delimited(b'"', b'"', ParseErrorKind::UnterminatedQuotedString)
    }

    /// Parse a domain-literal at the cursor; returns the content without brackets.
    pub fn parse_domain_literal(&mut self) -> Result<String, ParseError> {
        self.delimited(b'[', b']', ParseErrorKind::UnterminatedDomainLiteral)
    }

    fn delimited(&mut self, open: u8, close: u8, kind: ParseErrorKind) -> Result<String, ParseError> {
        let start = self.cursor.position();
        if !self.eat(open) {
            return Err(self.error(ParseErrorKind::UnexpectedByte));
        }
        let mut raw = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                self.reset(start);
                return Err(ParseError::new(kind, start));
            };
            if b == close {
                self.bump();
                break;
            }
            match b {
                b'\\' => {
                    self.bump();
                    match self.cursor.next_byte() {
                        Some(x) => raw.push(x),
                        None => {
                            self.reset(start);
                            return Err(ParseError::new(kind, start));
                        }
                    }
                }
                b'\r' | b'\n' if fold_len(&self.cursor, self.crlf) > 0 => {
                    let n = fold_len(&self.cursor, self.crlf);
                    self.cursor.advance(n);
                }
                _ => {
                    raw.push(b);
                    self.bump();
                }
            }
        }
        Ok(bytes_to_string(&raw))
    }

    /// Parse an atom (atext run) at the cursor.
    pub fn parse_atom(&mut self) -> Option<&'a [u8]> {
        let atom = self.cursor.take_while(is_atext);
        (!atom.is_empty()).then_some(atom)
    }

    /// Parse an RFC 2045 token at the cursor.
    pub fn parse_token(&mut self) -> Option<&'a [u8]> {
        let token = self.cursor.take_while(is_token_char);
        (!token.is_empty()).then_some(token)
    }

    /// Parse `atom *("." atom)` without CFWS. A single trailing dot is accepted.
    pub fn parse_dot_atom(&mut self) -> Option<&'a [u8]> {
        let start = self.cursor.position();
        self.parse_atom()?;
        while self.peek() == Some(b'.') {
            self.bump();
            if self.parse_atom().is_none() {
                break;
            }
        }
        Some(self.cursor.slice(start, self.cursor.position()))
    }

    /// Parse one encoded word and any further encoded words separated from it only by
    /// folding whitespace, joined into one token. The cursor is unchanged on failure.
    pub fn parse_encoded_word_run(&mut self) -> Option<Token<'a>> {
        let first = parse_encoded_word(&mut self.cursor)?;
        let mut text = first.text();
        loop {
            let save = self.position();
            self.skip_whitespace();
            if !self.cursor.starts_with(b"=?") {
                self.reset(save);
                break;
            }
            match parse_encoded_word(&mut self.cursor) {
                Some(word) => text.push_str(&word.text()),
                None => {
                    self.reset(save);
                    break;
                }
            }
        }
        Some(Token::new(
            TokenKind::EncodedWord,
            TokenValue::Encoded {
                text,
                charset: first.charset,
                language: first.language,
            },
        ))
    }

    /// Parse a word: atom or quoted-string (CFWS is not skipped).
    pub fn parse_word(&mut self) -> Result<Option<String>, ParseError> {
        match self.peek() {
            Some(b'"') => self.parse_quoted_string().map(Some),
            _ => Ok(self.parse_atom().map(bytes_to_string)),
        }
    }

    /// Parse a phrase: words (atoms, quoted-strings, encoded words) separated by CFWS, plus
    /// obsolete embedded dots. Words are joined by one space, except adjacent encoded words
    /// separated only by folding whitespace, which are joined directly. Returns `None`, with
    /// the cursor unchanged, if no word is present.
    pub fn parse_phrase(&mut self) -> Result<Option<String>, ParseError> {
        let start = self.position();
        let mut out = String::new();
        let mut words = 0usize;
        let mut prev_encoded = false;
        loop {
            let gap_start = self.position();
            let mut gap_comment = false;
            loop {
                self.skip_whitespace();
                if self.peek() != Some(b'(') {
                    break;
                }
                self.comment(false)?;
                gap_comment = true;
            }
            let gap = self.position() != gap_start;
            let Some(b) = self.peek() else {
                break;
            };
            let (word, encoded) = match b {
                b'"' => (self.parse_quoted_string()?, false),
                b'=' if self.cursor.peek_at(1) == Some(b'?') => match parse_encoded_word(&mut self.cursor) {
                    Some(w) => (w.text(), true),
                    None => match self.parse_atom() {
                        Some(atom) => (bytes_to_string(atom), false),
                        None => break,
                    },
                },
                b'.' if words > 0 => {
                    log::debug!("obsolete phrase: '.' at offset {}", self.position());
                    self.bump();
                    out.push('.');
                    prev_encoded = false;
                    continue;
                }
                _ if is_atext(b) => match self.parse_atom() {
                    Some(atom) => (bytes_to_string(atom), false),
                    None => break,
                },
                _ => break,
            };
            if words > 0 && gap && !(prev_encoded && encoded && !gap_comment) {
                out.push(' ');
            }
            out.push_str(&word);
            words += 1;
            prev_encoded = encoded;
        }
        if words == 0 {
            self.reset(start);
            return Ok(None);
        }
        Ok(Some(out))
    }

    /// Return the next token whose kind the caller accepts, or `None` at end of input.
    ///
    /// Comments are skipped unless requested. Unrequested quoted-strings and domain-literals
    /// come back as specials and atoms one at a time (inside such a quoted-string `(`, `)` and
    /// `\` are plain specials); an unrequested or malformed encoded word
    /// comes back as an atom. A byte that fits no token (a control byte, or a lone line
    /// break in CRLF mode) is an error at its offset.
    pub fn next_token(&mut self, mask: TokenMask) -> Result<Option<Token<'a>>, ParseError> {
        let mime = mask.mime_alphabet();
        if self.in_quote {
            return Ok(self.quoted_piece(mime));
        }
        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            let start = self.position();
            match b {
                b'(' => {
                    if mask.contains(TokenMask::COMMENT) {
                        let text = self.comment(true)?;
                        return Ok(Some(Token::text(TokenKind::Comment, text)));
                    }
                    self.comment(false)?;
                    continue;
                }
                b'"' if mask.contains(TokenMask::PHRASE) && !mime => return self.phrase_token(),
                b'"' if mask.contains(TokenMask::QUOTED_STRING) => {
                    let text = self.parse_quoted_string()?;
                    return Ok(Some(Token::text(TokenKind::QuotedString, text)));
                }
                b'[' if mask.contains(TokenMask::DOMAIN_LITERAL) => {
                    let text = self.parse_domain_literal()?;
                    return Ok(Some(Token::text(TokenKind::DomainLiteral, text)));
                }
                b'=' if self.cursor.peek_at(1) == Some(b'?') => {
                    if mask.contains(TokenMask::PHRASE) && !mime {
                        return self.phrase_token();
                    }
                    if mask.contains(TokenMask::ENCODED_WORD) {
                        if let Some(token) = self.parse_encoded_word_run() {
                            return Ok(Some(token));
                        }
                        log::debug!("malformed encoded word at offset {} read as plain text", start);
                    }
                }
                _ => {}
            }

            if mime {
                if is_tspecial(b) {
                    self.in_quote = b == b'"';
                    self.bump();
                    return Ok(Some(Token::raw(TokenKind::TSpecial, self.cursor.slice(start, start + 1))));
                }
                if let Some(token) = self.parse_token() {
                    return Ok(Some(Token::raw(TokenKind::Token, token)));
                }
            } else {
                if is_special(b) {
                    self.in_quote = b == b'"';
                    self.bump();
                    return Ok(Some(Token::raw(TokenKind::Special, self.cursor.slice(start, start + 1))));
                }
                if is_atext(b) {
                    if mask.contains(TokenMask::PHRASE) {
                        return self.phrase_token();
                    }
                    if mask.contains(TokenMask::DOT_ATOM) {
                        if let Some(dot_atom) = self.parse_dot_atom() {
                            return Ok(Some(Token::raw(TokenKind::DotAtom, dot_atom)));
                        }
                    }
                    if let Some(atom) = self.parse_atom() {
                        return Ok(Some(Token::raw(TokenKind::Atom, atom)));
                    }
                }
            }
            return Err(self.error(ParseErrorKind::UnexpectedByte));
        }
    }

    /// Next piece of a decomposed quoted-string: an atom (or token) run, or one special. An
    /// escaped byte is always a piece of its own and never closes the string.
    fn quoted_piece(&mut self, mime: bool) -> Option<Token<'a>> {
        let escaped = std::mem::take(&mut self.quote_escape);
        if !escaped {
            self.skip_whitespace();
        }
        let Some(b) = self.peek() else {
            self.in_quote = false;
            return None;
        };
        let start = self.position();
        let (word_kind, special_kind) = if mime {
            (TokenKind::Token, TokenKind::TSpecial)
        } else {
            (TokenKind::Atom, TokenKind::Special)
        };
        let is_word = |c: u8| if mime { is_token_char(c) } else { is_atext(c) };
        if !escaped {
            match b {
                b'"' => self.in_quote = false,
                b'\\' => self.quote_escape = true,
                _ => {
                    let run = self.cursor.take_while(is_word);
                    if !run.is_empty() {
                        return Some(Token::raw(word_kind, run));
                    }
                }
            }
        }
        self.bump();
        let kind = if !escaped || !is_word(b) { special_kind } else { word_kind };
        Some(Token::raw(kind, self.cursor.slice(start, start + 1)))
    }

    fn phrase_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        Ok(self.parse_phrase()?.map(|p| Token::text(TokenKind::Phrase, p)))
    }
}

/// Run `parse` over a whole header value. Empty or CFWS-only input gives `None`; input left
/// over after `parse` is an error.
pub(crate) fn parse_all<'a, T>(
    input: &'a [u8],
    crlf: bool,
    parse: impl FnOnce(&mut Tokenizer<'a>) -> Result<T, ParseError>,
) -> Result<Option<T>, ParseError> {
    let mut t = Tokenizer::new(input, crlf);
    t.skip_cfws()?;
    if t.is_at_end() {
        return Ok(None);
    }
    let value = parse(&mut t)?;
    t.skip_cfws()?;
    if !t.is_at_end() {
        return Err(t.error(ParseErrorKind::TrailingGarbage));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8], mask: TokenMask) -> Vec<(TokenKind, String)> {
        let mut t = Tokenizer::new(input, false);
        let mut out = Vec::new();
        while let Some(token) = t.next_token(mask).unwrap() {
            out.push((token.kind(), token.as_text().into_owned()));
        }
        out
    }

    fn kinds_and_text(list: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
        list.iter().map(|&(k, s)| (k, s.to_string())).collect()
    }

    #[test]
    fn dot_atom_as_one_token() {
        assert_eq!(
            tokens(b"a.b.c", TokenMask::DOT_ATOM),
            kinds_and_text(&[(TokenKind::DotAtom, "a.b.c")])
        );
    }

    #[test]
    fn dot_atom_decomposes_without_mask() {
        use TokenKind::*;
        assert_eq!(
            tokens(b"a.b.c", TokenMask::ATOM | TokenMask::SPECIAL),
            kinds_and_text(&[(Atom, "a"), (Special, "."), (Atom, "b"), (Special, "."), (Atom, "c")])
        );
    }

    #[test]
    fn dot_atom_accepts_trailing_dot() {
        let mut t = Tokenizer::new(b"host.example. rest", false);
        assert_eq!(t.parse_dot_atom(), Some(&b"host.example."[..]));
        let mut t = Tokenizer::new(b"a..b", false);
        assert_eq!(t.parse_dot_atom(), Some(&b"a."[..]));
        assert_eq!(t.rest(), b".b");
    }

    #[test]
    fn comments_skipped_unless_requested() {
        let input = b"foo (a (nested) comment) bar";
        assert_eq!(
            tokens(input, TokenMask::ATOM),
            kinds_and_text(&[(TokenKind::Atom, "foo"), (TokenKind::Atom, "bar")])
        );
        assert_eq!(
            tokens(input, TokenMask::ATOM | TokenMask::COMMENT),
            kinds_and_text(&[
                (TokenKind::Atom, "foo"),
                (TokenKind::Comment, "a (nested) comment"),
                (TokenKind::Atom, "bar"),
            ])
        );
    }

    #[test]
    fn unbalanced_comment_points_at_outer_paren() {
        let mut t = Tokenizer::new(b"x (a (b) c", false);
        assert!(t.next_token(TokenMask::ATOM).unwrap().is_some());
        let err = t.next_token(TokenMask::ATOM).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::UnterminatedComment, 2));
        assert_eq!(t.position(), 2);
    }

    #[test]
    fn quoted_string_unescapes_and_unfolds() {
        let mut t = Tokenizer::new(b"\"a \\\"b\\\\\r\n c\"", true);
        let token = t.next_token(TokenMask::QUOTED_STRING).unwrap().unwrap();
        assert_eq!(token.kind(), TokenKind::QuotedString);
        assert_eq!(token.as_text(), "a \"b\\ c");
        assert!(t.is_at_end());
    }

    #[test]
    fn quoted_string_decomposes_when_not_requested() {
        use TokenKind::*;
        assert_eq!(
            tokens(b"\"John Doe\"", TokenMask::ATOM | TokenMask::SPECIAL),
            kinds_and_text(&[(Special, "\""), (Atom, "John"), (Atom, "Doe"), (Special, "\"")])
        );
    }

    #[test]
    fn decomposed_quote_hides_comment_and_escape_starters() {
        use TokenKind::*;
        assert_eq!(
            tokens(b"\"(x\" (note) y", TokenMask::ATOM | TokenMask::SPECIAL),
            kinds_and_text(&[(Special, "\""), (Special, "("), (Atom, "x"), (Special, "\""), (Atom, "y")])
        );
        assert_eq!(
            tokens(b"\"a\\\"b\"", TokenMask::ATOM | TokenMask::SPECIAL),
            kinds_and_text(&[
                (Special, "\""),
                (Atom, "a"),
                (Special, "\\"),
                (Special, "\""),
                (Atom, "b"),
                (Special, "\""),
            ])
        );
    }

    #[test]
    fn decomposed_quote_in_mime_alphabet() {
        use TokenKind::*;
        assert_eq!(
            tokens(b"\"a)b\"", TokenMask::TOKEN | TokenMask::TSPECIAL),
            kinds_and_text(&[(TSpecial, "\""), (Token, "a"), (TSpecial, ")"), (Token, "b"), (TSpecial, "\"")])
        );
    }

    #[test]
    fn unterminated_quoted_string() {
        let mut t = Tokenizer::new(b"  \"abc", false);
        let err = t.next_token(TokenMask::QUOTED_STRING).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedQuotedString);
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn domain_literal() {
        let mut t = Tokenizer::new(b"[192.168.0.1]", false);
        let token = t.next_token(TokenMask::DOMAIN_LITERAL).unwrap().unwrap();
        assert_eq!(token.kind(), TokenKind::DomainLiteral);
        assert_eq!(token.as_text(), "192.168.0.1");
    }

    #[test]
    fn adjacent_encoded_words_coalesce() {
        let mut t = Tokenizer::new(b"=?utf-8?q?Hello?= =?utf-8?q?World?= tail", false);
        let token = t.next_token(TokenMask::ENCODED_WORD | TokenMask::ATOM).unwrap().unwrap();
        assert_eq!(token.kind(), TokenKind::EncodedWord);
        assert_eq!(token.as_text(), "HelloWorld");
        assert_eq!(token.charset(), Some("utf-8"));
        let tail = t.next_token(TokenMask::ENCODED_WORD | TokenMask::ATOM).unwrap().unwrap();
        assert_eq!(tail.as_text(), "tail");
    }

    #[test]
    fn encoded_word_degrades_to_atom() {
        let toks = tokens(b"=?utf-8?z?abc?=", TokenMask::ENCODED_WORD | TokenMask::ATOM);
        assert_eq!(toks, kinds_and_text(&[(TokenKind::Atom, "=?utf-8?z?abc?=")]));
        let toks = tokens(b"=?utf-8?q?abc?=", TokenMask::ATOM);
        assert_eq!(toks, kinds_and_text(&[(TokenKind::Atom, "=?utf-8?q?abc?=")]));
    }

    #[test]
    fn phrase_joins_words() {
        let mut t = Tokenizer::new(b"John  \"Q.\" (x) Public <", false);
        assert_eq!(t.parse_phrase().unwrap().as_deref(), Some("John Q. Public"));
        assert_eq!(t.peek(), Some(b'<'));
    }

    #[test]
    fn phrase_with_encoded_words_and_dots() {
        let mut t = Tokenizer::new(b"=?utf-8?q?Andr=C3=A9?= =?utf-8?q?_M?= Q. Smith", false);
        assert_eq!(t.parse_phrase().unwrap().as_deref(), Some("Andr\u{e9} M Q. Smith"));
    }

    #[test]
    fn phrase_absent() {
        let mut t = Tokenizer::new(b"  <a@b>", false);
        assert_eq!(t.parse_phrase().unwrap(), None);
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn phrase_token_kind() {
        let toks = tokens(b"Foo Bar, Baz", TokenMask::PHRASE);
        assert_eq!(
            toks,
            kinds_and_text(&[(TokenKind::Phrase, "Foo Bar"), (TokenKind::Special, ","), (TokenKind::Phrase, "Baz")])
        );
    }

    #[test]
    fn mime_alphabet_tokens() {
        use TokenKind::*;
        assert_eq!(
            tokens(b"text/plain; charset=us-ascii", TokenMask::TOKEN | TokenMask::TSPECIAL),
            kinds_and_text(&[
                (Token, "text"),
                (TSpecial, "/"),
                (Token, "plain"),
                (TSpecial, ";"),
                (Token, "charset"),
                (TSpecial, "="),
                (Token, "us-ascii"),
            ])
        );
    }

    #[test]
    fn folding_depends_on_line_mode() {
        let mut t = Tokenizer::new(b"a\r\n b", true);
        assert_eq!(t.next_token(TokenMask::ATOM).unwrap().unwrap().as_text(), "a");
        assert_eq!(t.next_token(TokenMask::ATOM).unwrap().unwrap().as_text(), "b");

        let mut t = Tokenizer::new(b"a\n b", true);
        assert!(t.next_token(TokenMask::ATOM).unwrap().is_some());
        let err = t.next_token(TokenMask::ATOM).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::UnexpectedByte, 1));

        assert_eq!(tokens(b"a\n b\n", TokenMask::ATOM).len(), 2);
    }

    #[test]
    fn comment_decodes_encoded_words() {
        let mut t = Tokenizer::new(b"(=?utf-8?q?caf=C3=A9?= =?utf-8?q?_au_lait?= \\) ok)", false);
        assert_eq!(t.parse_comment().unwrap(), "caf\u{e9} au lait ) ok");
    }

    #[test]
    fn raw_tokens_borrow_the_input() {
        let input = b"local.part@example.org".to_vec();
        let mut t = Tokenizer::new(&input, false);
        let token = t.next_token(TokenMask::DOT_ATOM).unwrap().unwrap();
        assert_eq!(token.as_raw(), Some(&input[..10]));
    }
}
