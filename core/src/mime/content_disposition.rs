/*
 * content_disposition.rs
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

//! Content-Disposition header (RFC 2183): `token *(";" parameter)`.

use std::fmt;

use super::content_type::trailing_parameters;
use super::parameter::{format_parameter, ParameterMap};
use super::tokenizer::{parse_all, Tokenizer};
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::rfc2047::bytes_to_string;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentDisposition {
    disposition_type: String,
    parameters: ParameterMap,
}

impl ContentDisposition {
    pub fn new(disposition_type: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            disposition_type: disposition_type.into().to_ascii_lowercase(),
            parameters,
        }
    }

    pub fn get_disposition_type(&self) -> &str {
        &self.disposition_type
    }

    pub fn is_disposition_type(&self, t: &str) -> bool {
        self.disposition_type.eq_ignore_ascii_case(t)
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

    /// The `filename` parameter, decoded.
    pub fn filename(&self) -> Option<&str> {
        self.get_parameter("filename")
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.disposition_type)?;
        for p in self.parameters.iter() {
            write!(f, "; {}", format_parameter(p.get_name(), p.get_value()))?;
        }
        Ok(())
    }
}

pub fn content_disposition(t: &mut Tokenizer<'_>) -> Result<ContentDisposition, ParseError> {
    t.skip_cfws()?;
    let disposition_type = match t.parse_token() {
        Some(token) => bytes_to_string(token),
        None => return Err(t.error(ParseErrorKind::ExpectedToken)),
    };
    let parameters = trailing_parameters(t)?;
    Ok(ContentDisposition::new(disposition_type, parameters))
}

pub fn parse_content_disposition(input: &[u8], crlf: bool) -> Result<Option<ContentDisposition>, ParseError> {
    parse_all(input, crlf, content_disposition)
}
