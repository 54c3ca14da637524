/*
 * q_encoding.rs
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

//! Hex-escaping word encoder: RFC 2047 "Q" (escape `=`) and RFC 2231 values (escape `%`).

use crate::config::Newline;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::mime::codec::{Progress, Staging, Transform};
use crate::mime::utils::is_etext;

/// Encoder for header words. Output never contains line breaks.
#[derive(Debug, Clone)]
pub struct QEncodingEncoder {
    escape: u8,
    staging: Staging,
}

impl QEncodingEncoder {
    pub fn new(escape: u8) -> Self {
        Self {
            escape,
            staging: Staging::default(),
        }
    }

    /// Etext goes out as is with either escape; everything else is hex-escaped.
    fn is_literal(&self, ch: u8) -> bool {
        is_etext(ch) && ch != self.escape
    }
}

impl Transform for QEncodingEncoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, _newline: Newline) -> Progress {
        let (src_start, dst_start) = (src.position(), dst.position());
        while !dst.is_full() {
            if !self.staging.is_empty() {
                self.staging.flush(dst);
                continue;
            }
            let Some(ch) = src.next_byte() else {
                break;
            };
            if self.is_literal(ch) {
                dst.put(ch);
            } else if ch == b' ' && self.escape == b'=' {
                dst.put(b'_');
            } else {
                self.staging.push_hex(self.escape, ch);
            }
        }
        Progress::since(src_start, dst_start, src, dst)
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, _newline: Newline) -> bool {
        self.staging.flush(dst)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Newline;
    use crate::mime::codec::Codec;

    fn q(input: &[u8]) -> String {
        String::from_utf8(Codec::Rfc2047Q.encode(input, Newline::Lf).to_vec()).unwrap()
    }

    fn pct(input: &[u8]) -> String {
        String::from_utf8(Codec::Rfc2231.encode(input, Newline::Lf).to_vec()).unwrap()
    }

    #[test]
    fn space_depends_on_escape() {
        assert_eq!(q(b"Hello World"), "Hello_World");
        assert_eq!(pct(b"Hello World"), "Hello%20World");
    }

    #[test]
    fn specials_are_escaped() {
        assert_eq!(q(b"a=b_c?d"), "a=3Db=5Fc=3Fd");
        assert_eq!(q(b"+-*/!"), "+-*/!");
        assert_eq!(pct(b"100%"), "100%25");
        assert_eq!(pct(b"a/b*c"), "a/b*c");
        assert_eq!(pct("\u{e9}t\u{e9}".as_bytes()), "%C3%A9t%C3%A9");
        assert_eq!(q(b"\r\n"), "=0D=0A");
    }

    #[test]
    fn both_escapes_keep_only_etext() {
        assert_eq!(pct(b"a*b/c.d_e"), "a*b/c%2Ed%5Fe");
        assert_eq!(q(b"a*b/c.d_e"), "a*b/c=2Ed=5Fe");
        assert_eq!(pct(b"#$&^`{|}~'"), "%23%24%26%5E%60%7B%7C%7D%7E%27");
    }

    #[test]
    fn percent_output_matches_reference_decoder() {
        let input = "na\u{ef}ve r\u{e9}sum\u{e9}_(1).pdf".as_bytes();
        let encoded = pct(input);
        let decoded: Vec<u8> = percent_encoding::percent_decode_str(&encoded).collect();
        assert_eq!(decoded, input);
        assert_eq!(&Codec::Rfc2231.decode(encoded.as_bytes(), Newline::Lf).data[..], input);
    }
}
