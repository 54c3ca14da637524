/*
 * simple_fields.rs
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

//! Single-value structured fields: a dot-atom (MIME-Version) or a token
//! (Content-Transfer-Encoding), each surrounded only by CFWS.

use super::tokenizer::{parse_all, Tokenizer};
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::codec::Codec;
use crate::mime::registry;
use crate::mime::rfc2047::bytes_to_string;

pub fn dot_atom_field(t: &mut Tokenizer<'_>) -> Result<String, ParseError> {
    t.skip_cfws()?;
    match t.parse_dot_atom() {
        Some(dot_atom) => Ok(bytes_to_string(dot_atom)),
        None => Err(t.error(ParseErrorKind::ExpectedWord)),
    }
}

pub fn token_field(t: &mut Tokenizer<'_>) -> Result<String, ParseError> {
    t.skip_cfws()?;
    match t.parse_token() {
        Some(token) => Ok(bytes_to_string(token)),
        None => Err(t.error(ParseErrorKind::ExpectedToken)),
    }
}

pub fn parse_dot_atom_field(input: &[u8], crlf: bool) -> Result<Option<String>, ParseError> {
    parse_all(input, crlf, dot_atom_field)
}

pub fn parse_token_field(input: &[u8], crlf: bool) -> Result<Option<String>, ParseError> {
    parse_all(input, crlf, token_field)
}

/// Content-Transfer-Encoding mapped to a body codec. Identity encodings (`7bit`, `8bit`,
/// `binary`), header-word codecs (`B`, `Q`, `x-kmime-rfc2231`) and unknown names give `None`.
pub fn parse_transfer_encoding(input: &[u8], crlf: bool) -> Result<Option<Codec>, ParseError> {
    Ok(parse_token_field(input, crlf)?
        .and_then(|name| registry::lookup(&name))
        .filter(|codec| matches!(codec, Codec::Base64 | Codec::QuotedPrintable)))
}
