/*
 * message_id_list.rs
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

//! RFC 5322 msg-id parsing (Message-ID, Content-ID, References, In-Reply-To).

use super::address_parser::addr_spec;
use super::email_address::AddrSpec;
use super::obsolete::ObsoleteStructureType;
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::tokenizer::{parse_all, Tokenizer};

/// msg-id = [CFWS] "<" id-left "@" id-right ">" [CFWS]
pub fn msg_id(t: &mut Tokenizer<'_>) -> Result<AddrSpec, ParseError> {
    t.skip_cfws()?;
    if !t.eat(b'<') {
        return Err(t.error(ParseErrorKind::UnexpectedByte));
    }
    let id = addr_spec(t)?;
    t.skip_cfws()?;
    if !t.eat(b'>') {
        return Err(t.error(ParseErrorKind::ExpectedAngleClose));
    }
    t.skip_cfws()?;
    Ok(id)
}

/// Whitespace-separated msg-ids; commas between them are tolerated.
pub fn msg_id_list(t: &mut Tokenizer<'_>) -> Result<Vec<AddrSpec>, ParseError> {
    let mut out = Vec::new();
    loop {
        t.skip_cfws()?;
        match t.peek() {
            None => return Ok(out),
            Some(b',') => {
                ObsoleteStructureType::ObsoleteMessageIdSyntax.report(t.position());
                t.bump();
            }
            Some(_) => out.push(msg_id(t)?),
        }
    }
}

/// Parse exactly one msg-id.
pub fn parse_msg_id(input: &[u8], crlf: bool) -> Result<Option<AddrSpec>, ParseError> {
    parse_all(input, crlf, msg_id)
}

/// Parse a list of msg-ids (References, In-Reply-To).
pub fn parse_message_id_list(input: &[u8], crlf: bool) -> Result<Vec<AddrSpec>, ParseError> {
    Ok(parse_all(input, crlf, msg_id_list)?.unwrap_or_default())
}
