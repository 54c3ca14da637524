/*
 * phrase_list.rs
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

//! Keywords: comma-separated phrases.

use crate::error::{ParseError, ParseErrorKind};
use crate::mime::tokenizer::{parse_all, Tokenizer};

pub fn phrase_list(t: &mut Tokenizer<'_>) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::new();
    loop {
        t.skip_cfws()?;
        match t.peek() {
            None => return Ok(out),
            Some(b',') => {
                t.bump();
                continue;
            }
            Some(_) => {}
        }
        match t.parse_phrase()? {
            Some(phrase) => out.push(phrase),
            None => return Err(t.error(ParseErrorKind::ExpectedWord)),
        }
        t.skip_cfws()?;
        match t.peek() {
            None => return Ok(out),
            Some(b',') => t.bump(),
            Some(_) => return Err(t.error(ParseErrorKind::UnexpectedByte)),
        }
    }
}

pub fn parse_phrase_list(input: &[u8], crlf: bool) -> Result<Vec<String>, ParseError> {
    Ok(parse_all(input, crlf, phrase_list)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        let list = parse_phrase_list(b"urgent, \"project x\", =?utf-8?q?r=C3=A9union?=", false).unwrap();
        assert_eq!(list, vec!["urgent", "project x", "r\u{e9}union"]);
    }

    #[test]
    fn empty_entries_are_skipped() {
        assert_eq!(parse_phrase_list(b",a,,b,", false).unwrap(), vec!["a", "b"]);
        assert!(parse_phrase_list(b"  ", false).unwrap().is_empty());
    }

    #[test]
    fn stray_special_is_an_error() {
        let err = parse_phrase_list(b"a; b", false).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::UnexpectedByte, 1));
    }
}
