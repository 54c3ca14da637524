/*
 * utils.rs
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

//! Character classes for header grammars (RFC 822/5322 atoms, RFC 2045 tokens, RFC 2047 etext).
//! Bytes >= 0x80 are accepted in atoms and tokens (RFC 6532).

use crate::cursor::ReadCursor;

/// Checks if a character is valid in an RFC 2045 token.
#[inline]
pub fn is_token_char(c: u8) -> bool {
    matches!(c,
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' |
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~'
    ) || c >= 0x80
}

/// Checks if the string is a valid RFC 2045 token (1+ token chars).
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|c| is_token_char(c) && c < 0x80)
}

/// RFC 5322 atext: token characters without '.', plus '/', '?' and '='.
#[inline]
pub fn is_atext(c: u8) -> bool {
    (is_token_char(c) && c != b'.') || matches!(c, b'/' | b'?' | b'=')
}

/// RFC 822 specials.
#[inline]
pub fn is_special(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'.' | b'[' | b']')
}

/// RFC 2045 tspecials.
#[inline]
pub fn is_tspecial(c: u8) -> bool {
    matches!(c,
        b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'='
    )
}

/// RFC 2047 characters allowed unencoded in a "Q" word inside a phrase.
#[inline]
pub fn is_etext(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'!' | b'*' | b'+' | b'-' | b'/')
}

#[inline]
pub fn is_wsp(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Length of the line break at the cursor if it folds (is followed by SP or HT), else 0.
/// In CRLF mode only CRLF can fold.
pub(crate) fn fold_len(c: &ReadCursor<'_>, crlf: bool) -> usize {
    match (c.peek(), c.peek_at(1), c.peek_at(2)) {
        (Some(b'\r'), Some(b'\n'), Some(w)) if is_wsp(w) => 2,
        (Some(b'\n'), Some(w), _) if !crlf && is_wsp(w) => 1,
        _ => 0,
    }
}

/// Length of a line break that ends the input, else 0.
pub(crate) fn trailing_break_len(c: &ReadCursor<'_>, crlf: bool) -> usize {
    match c.rest() {
        b"\r\n" => 2,
        b"\n" if !crlf => 1,
        _ => 0,
    }
}

/// True if `s` is a dot-atom (atoms joined by single dots) and needs no quoting.
pub fn is_dot_atom_text(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(|atom| !atom.is_empty() && atom.bytes().all(is_atext))
}

/// True if a display name can be written as a sequence of atoms without quoting.
pub fn is_phrase_text(s: &str) -> bool {
    !s.is_empty() && s.split(' ').all(|word| !word.is_empty() && word.bytes().all(is_atext))
}

/// Wrap `s` in double quotes, escaping `"` and `\`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
