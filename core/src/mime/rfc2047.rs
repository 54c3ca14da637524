/*
 * rfc2047.rs
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

//! RFC 2047 encoded words (`=?charset?q?text?=`), with the RFC 2231 language extension.
//! Used for phrases, comments, unstructured header values and (non-standard) parameter values.

use crate::config::{HeaderConfig, Newline};
use crate::cursor::ReadCursor;
use crate::mime::codec::Codec;
use crate::mime::registry;
use crate::mime::utils::{fold_len, is_token_char, is_wsp, trailing_break_len};

/// One decoded encoded word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWord {
    pub charset: String,
    pub language: Option<String>,
    pub codec: Codec,
    pub decoded: Vec<u8>,
}

impl EncodedWord {
    /// Decoded text, interpreting the bytes in the declared charset.
    pub fn text(&self) -> String {
        charset_bytes_to_string(&self.decoded, &self.charset)
    }
}

#[inline]
fn is_charset_char(b: u8) -> bool {
    is_token_char(b) && b < 0x80 && b != b'*'
}

#[inline]
fn is_encoded_text_char(b: u8) -> bool {
    b > b' ' && b < 0x7f && b != b'?'
}

/// Parse one encoded word at the cursor. On failure the cursor is left where it was.
pub fn parse_encoded_word(cursor: &mut ReadCursor<'_>) -> Option<EncodedWord> {
    let start = cursor.position();
    let word = parse_encoded_word_inner(cursor);
    if word.is_none() {
        cursor.set_position(start);
    }
    word
}

fn parse_encoded_word_inner(c: &mut ReadCursor<'_>) -> Option<EncodedWord> {
    if !c.starts_with(b"=?") {
        return None;
    }
    c.advance(2);
    let charset = c.take_while(is_charset_char);
    if charset.is_empty() {
        return None;
    }
    let language = if c.peek() == Some(b'*') {
        c.advance(1);
        Some(c.take_while(is_charset_char))
    } else {
        None
    };
    if c.next_byte()? != b'?' {
        return None;
    }
    let encoding = c.next_byte()?;
    // Only the single-letter names "B" and "Q" are valid here.
    let codec = match registry::lookup(std::str::from_utf8(&[encoding]).ok()?)? {
        codec @ (Codec::Rfc2047B | Codec::Rfc2047Q) => codec,
        _ => return None,
    };
    if c.next_byte()? != b'?' {
        return None;
    }
    let payload = c.take_while(is_encoded_text_char);
    if !c.starts_with(b"?=") {
        return None;
    }
    c.advance(2);
    let decoded = codec.decode(payload, Newline::Lf);
    Some(EncodedWord {
        charset: String::from_utf8_lossy(charset).into_owned(),
        language: language
            .filter(|l| !l.is_empty())
            .map(|l| String::from_utf8_lossy(l).into_owned()),
        codec,
        decoded: decoded.data.to_vec(),
    })
}

/// Unstructured header text after encoded-word decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Charset of the last decoded word, or the default charset.
    pub charset: String,
}

/// Decode an unstructured header value (Subject, Comments, ...).
///
/// Encoded words are decoded and whitespace between two adjacent encoded words is dropped.
/// Folds are unfolded. Malformed encoded words are kept literally. Raw bytes use the default
/// charset; encoded words use their declared charset unless `force_charset` is set.
pub fn decode_unstructured(input: &[u8], config: &HeaderConfig) -> DecodedText {
    let mut text = String::with_capacity(input.len());
    let mut literal: Vec<u8> = Vec::new();
    let mut after_word = false;
    let mut charset = config.default_charset.clone();
    let mut c = ReadCursor::new(input);
    while let Some(b) = c.peek() {
        if b == b'=' && c.peek_at(1) == Some(b'?') {
            if let Some(word) = parse_encoded_word(&mut c) {
                if !(after_word && literal.iter().all(|&b| is_wsp(b))) {
                    text.push_str(&charset_bytes_to_string(&literal, &config.default_charset));
                } else if !literal.is_empty() {
                    log::trace!("dropping whitespace between encoded words");
                }
                literal.clear();
                let cs = config.effective_charset(&word.charset);
                text.push_str(&charset_bytes_to_string(&word.decoded, cs));
                charset = cs.to_string();
                after_word = true;
                continue;
            }
            log::debug!("malformed encoded word at offset {} kept literally", c.position());
        } else if b == b'\r' || b == b'\n' {
            let n = fold_len(&c, config.crlf).max(trailing_break_len(&c, config.crlf));
            if n > 0 {
                c.advance(n);
                continue;
            }
        }
        literal.push(b);
        c.advance(1);
    }
    text.push_str(&charset_bytes_to_string(&literal, &config.default_charset));
    DecodedText { text, charset }
}

/// Expand RFC 2047 encoded-words in the string.
/// Used for parameter values that carry encoded words inside quotes.
pub fn decode_encoded_words(s: &str) -> String {
    if !s.contains("=?") {
        return s.to_string();
    }
    decode_unstructured(s.as_bytes(), &HeaderConfig::default()).text
}

/// Build one encoded word for `data` in `charset`, using "B" for base64 codecs and "Q" otherwise.
pub fn encode_word(data: &[u8], charset: &str, codec: Codec) -> String {
    let codec = match codec {
        Codec::Base64 | Codec::Rfc2047B => Codec::Rfc2047B,
        _ => Codec::Rfc2047Q,
    };
    let encoded = codec.encode(data, Newline::Lf);
    format!("=?{}?{}?{}?=", charset, codec.name(), String::from_utf8_lossy(&encoded))
}

/// Convert bytes to text: UTF-8 when valid, ISO-8859-1 otherwise.
pub fn bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect::<String>(),
    }
}

/// Interpret bytes in the named charset. Only UTF-8 and ISO-8859-1 are told apart; other
/// charsets get the UTF-8-then-ISO-8859-1 guess and the caller keeps the name.
pub fn charset_bytes_to_string(bytes: &[u8], charset: &str) -> String {
    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin1" | "latin-1" | "iso_8859-1" | "l1" => bytes.iter().map(|&b| b as char).collect(),
        _ => bytes_to_string(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encoded_words_b() {
        // =?UTF-8?B?SGVsbG8=?= -> Hello
        let s = "=?UTF-8?B?SGVsbG8=?=";
        assert_eq!(decode_encoded_words(s), "Hello");
    }

    #[test]
    fn decode_encoded_words_q() {
        // =?UTF-8?Q?Hello_World?= -> Hello World
        let s = "=?UTF-8?Q?Hello_World?=";
        assert_eq!(decode_encoded_words(s), "Hello World");
    }

    #[test]
    fn decode_encoded_words_mixed() {
        let s = "Hello =?UTF-8?B?V29ybGQ=?=!";
        assert_eq!(decode_encoded_words(s), "Hello World!");
    }

    #[test]
    fn adjacent_words_are_joined() {
        let s = "=?utf-8?q?Hello?= =?utf-8?q?World?=";
        assert_eq!(decode_encoded_words(s), "HelloWorld");
        let folded = b"=?utf-8?q?Hello?=\r\n =?utf-8?q?World?= again";
        let out = decode_unstructured(folded, &HeaderConfig::new().with_crlf(true));
        assert_eq!(out.text, "HelloWorld again");
    }

    #[test]
    fn malformed_word_is_literal() {
        assert_eq!(decode_encoded_words("=?utf-8?x?abc?= ok"), "=?utf-8?x?abc?= ok");
        assert_eq!(decode_encoded_words("=?utf-8?q?no end"), "=?utf-8?q?no end");
    }

    #[test]
    fn parse_word_with_language() {
        let mut c = ReadCursor::new(b"=?US-ASCII*EN?Q?Keith_Moore?= rest");
        let word = parse_encoded_word(&mut c).unwrap();
        assert_eq!(word.charset, "US-ASCII");
        assert_eq!(word.language.as_deref(), Some("EN"));
        assert_eq!(word.text(), "Keith Moore");
        assert_eq!(c.rest(), b" rest");
    }

    #[test]
    fn failed_parse_leaves_cursor() {
        let mut c = ReadCursor::new(b"=?utf-8?q?a b?=");
        assert!(parse_encoded_word(&mut c).is_none());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn force_charset_overrides_declared() {
        let input = b"=?utf-8?q?caf=E9?=";
        let plain = decode_unstructured(input, &HeaderConfig::default());
        assert_eq!(plain.text, "caf\u{FFFD}");
        assert_eq!(plain.charset, "utf-8");
        let forced = HeaderConfig::new().with_default_charset("iso-8859-1").with_force_charset(true);
        let out = decode_unstructured(input, &forced);
        assert_eq!(out.text, "caf\u{e9}");
        assert_eq!(out.charset, "iso-8859-1");
    }

    #[test]
    fn valid_utf8_is_kept_verbatim() {
        assert_eq!(bytes_to_string("a\u{FFFD}b".as_bytes()), "a\u{FFFD}b");
        assert_eq!(bytes_to_string(b"caf\xe9"), "caf\u{e9}");
        assert_eq!(charset_bytes_to_string("x\u{FFFD}".as_bytes(), "koi8-r"), "x\u{FFFD}");
    }

    #[test]
    fn raw_bytes_use_default_charset() {
        let config = HeaderConfig::new().with_default_charset("iso-8859-1");
        assert_eq!(decode_unstructured(b"caf\xe9", &config).text, "caf\u{e9}");
        assert_eq!(decode_unstructured("caf\u{e9}".as_bytes(), &HeaderConfig::default()).text, "caf\u{e9}");
    }

    #[test]
    fn lone_lf_is_not_a_fold_in_crlf_mode() {
        let out = decode_unstructured(b"a\n b", &HeaderConfig::new().with_crlf(true));
        assert_eq!(out.text, "a\n b");
        let out = decode_unstructured(b"a\n b", &HeaderConfig::new());
        assert_eq!(out.text, "a b");
    }

    #[test]
    fn encode_word_round_trips() {
        let q = encode_word("Caf\u{e9} cr\u{e8}me".as_bytes(), "utf-8", Codec::Rfc2047Q);
        assert_eq!(q, "=?utf-8?Q?Caf=C3=A9_cr=C3=A8me?=");
        assert_eq!(decode_encoded_words(&q), "Caf\u{e9} cr\u{e8}me");
        let b = encode_word(b"Hello", "us-ascii", Codec::Base64);
        assert_eq!(b, "=?us-ascii?B?SGVsbG8=?=");
        assert_eq!(decode_encoded_words(&b), "Hello");
    }
}
