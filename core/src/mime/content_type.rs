/*
 * content_type.rs
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

//! Content-Type header (RFC 2045): `type "/" subtype *(";" parameter)`.

use std::fmt;

use super::parameter::{format_parameter, parameter_list, ParameterMap};
use super::tokenizer::{parse_all, Tokenizer};
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::rfc2047::bytes_to_string;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentType {
    primary_type: String,
    sub_type: String,
    parameters: ParameterMap,
}

impl ContentType {
    pub fn new(primary_type: impl Into<String>, sub_type: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            primary_type: primary_type.into().to_ascii_lowercase(),
            sub_type: sub_type.into().to_ascii_lowercase(),
            parameters,
        }
    }

    pub fn get_primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn get_sub_type(&self) -> &str {
        &self.sub_type
    }

    /// `type/subtype`
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.primary_type, self.sub_type)
    }

    pub fn is_primary_type(&self, t: &str) -> bool {
        self.primary_type.eq_ignore_ascii_case(t)
    }

    pub fn is_sub_type(&self, t: &str) -> bool {
        self.sub_type.eq_ignore_ascii_case(t)
    }

    pub fn is_mime_type(&self, primary: &str, sub: &str) -> bool {
        self.is_primary_type(primary) && self.is_sub_type(sub)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary_type, self.sub_type)?;
        for p in self.parameters.iter() {
            write!(f, "; {}", format_parameter(p.get_name(), p.get_value()))?;
        }
        Ok(())
    }
}

fn token(t: &mut Tokenizer<'_>) -> Result<String, ParseError> {
    t.skip_cfws()?;
    match t.parse_token() {
        Some(token) => Ok(bytes_to_string(token)),
        None => Err(t.error(ParseErrorKind::ExpectedToken)),
    }
}

/// Parameters after the leading value: end of input or `;` parameter-list.
pub(crate) fn trailing_parameters(t: &mut Tokenizer<'_>) -> Result<ParameterMap, ParseError> {
    t.skip_cfws()?;
    match t.peek() {
        None => Ok(ParameterMap::new()),
        Some(b';') => parameter_list(t),
        Some(_) => Err(t.error(ParseErrorKind::ExpectedSemicolon)),
    }
}

pub fn content_type(t: &mut Tokenizer<'_>) -> Result<ContentType, ParseError> {
    let primary = token(t)?;
    t.skip_cfws()?;
    if !t.eat(b'/') {
        return Err(t.error(ParseErrorKind::ExpectedSlash));
    }
    let sub = token(t)?;
    let parameters = trailing_parameters(t)?;
    Ok(ContentType::new(primary, sub, parameters))
}

/// Parse a Content-Type header value.
pub fn parse_content_type(input: &[u8], crlf: bool) -> Result<Option<ContentType>, ParseError> {
    parse_all(input, crlf, content_type)
}
