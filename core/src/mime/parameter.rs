/*
 * parameter.rs
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

//! MIME header parameters (RFC 2045 section 5.1) with RFC 2231 continuations, charsets and
//! languages.
//!
//! `name*0`, `name*1*`, ... fragments are merged in numeric section order before the value
//! is percent-decoded, so an escape may straddle two fragments. An extended value (`name*`
//! or `name*0*`) takes precedence over a plain `name`; otherwise the last duplicate wins.

use std::collections::BTreeMap;

use crate::config::Newline;
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::codec::{Codec, HEX_UPPER};
use crate::mime::rfc2047::{bytes_to_string, charset_bytes_to_string, decode_encoded_words};
use crate::mime::tokenizer::{parse_all, Tokenizer};
use crate::mime::utils::{is_token, is_token_char, quote};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    name: String,
    value: String,
    charset: Option<String>,
    language: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            charset: None,
            language: None,
        }
    }

    /// Attach the charset and language of an RFC 2231 extended value.
    pub fn with_encoding(mut self, charset: Option<String>, language: Option<String>) -> Self {
        self.charset = charset;
        self.language = language;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn get_charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn get_language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Parameters keyed by lower-cased name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterMap(BTreeMap<String, Parameter>);

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any parameter with the same (case-insensitive) name.
    pub fn insert(&mut self, parameter: Parameter) {
        self.0.insert(parameter.name.to_ascii_lowercase(), parameter);
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameter(name).map(Parameter::get_value)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.0.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.0.values()
    }
}

impl FromIterator<Parameter> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for p in iter {
            map.insert(p);
        }
        map
    }
}

/// One `name*N[*]=value` piece before merging.
#[derive(Debug)]
struct Fragment {
    extended: bool,
    text: String,
}

/// Split `name*N*` into (base name, section, extended).
fn split_name(name: &str) -> (String, Option<u32>, bool) {
    let lower = name.to_ascii_lowercase();
    let (rest, extended) = match lower.strip_suffix('*') {
        Some(rest) => (rest, true),
        None => (lower.as_str(), false),
    };
    if let Some(star) = rest.rfind('*') {
        let digits = &rest[star + 1..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u32>() {
                return (rest[..star].to_string(), Some(n), extended);
            }
        }
    }
    (rest.to_string(), None, extended)
}

/// Unquoted value. Tokens, plus the tspecials that commonly appear unquoted (`=`, `/`, ...).
#[inline]
fn is_bare_value_char(b: u8) -> bool {
    b > b' ' && b != 0x7f && !matches!(b, b';' | b'"' | b'(' | b')' | b'\\')
}

/// Skip a broken value up to (not including) the next `;`.
fn skip_value(t: &mut Tokenizer<'_>) {
    let skipped = t.take_while(|b| b != b';');
    log::debug!("skipped malformed parameter value {:?}", bytes_to_string(skipped));
}

/// Merge continuation fragments and decode the result.
fn merge(name: &str, fragments: &BTreeMap<u32, Fragment>) -> Parameter {
    let mut charset = None;
    let mut language = None;
    let mut encoded: Vec<u8> = Vec::new();
    let mut extended = false;
    let mut expected = 0u32;
    for (i, (&section, fragment)) in fragments.iter().enumerate() {
        if section != expected {
            log::debug!("parameter {}: continuation {} missing", name, expected);
        }
        expected = section.saturating_add(1);
        let mut text = fragment.text.as_str();
        if fragment.extended {
            if i == 0 {
                let mut parts = text.splitn(3, '\'');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(cs), Some(lang), Some(rest)) => {
                        charset = (!cs.is_empty()).then(|| cs.to_string());
                        language = (!lang.is_empty()).then(|| lang.to_string());
                        text = rest;
                    }
                    _ => log::debug!("parameter {}: extended value without charset", name),
                }
            }
            extended = true;
            encoded.extend_from_slice(text.as_bytes());
        } else {
            for &b in text.as_bytes() {
                if b == b'%' || !(b' '..=b'~').contains(&b) {
                    encoded.extend_from_slice(&[b'%', HEX_UPPER[(b >> 4) as usize], HEX_UPPER[(b & 0x0f) as usize]]);
                } else {
                    encoded.push(b);
                }
            }
        }
    }
    let value = if extended {
        let decoded = Codec::Rfc2231.decode(&encoded, Newline::Lf);
        match charset.as_deref() {
            Some(cs) => charset_bytes_to_string(&decoded.data, cs),
            None => bytes_to_string(&decoded.data),
        }
    } else {
        fragments.values().map(|f| f.text.as_str()).collect()
    };
    Parameter::new(name, value).with_encoding(charset, language)
}

/// parameter-list = *(";" parameter), parameter = attribute "=" value.
///
/// A malformed value is skipped up to the next `;`. A malformed name fails the whole list.
pub fn parameter_list(t: &mut Tokenizer<'_>) -> Result<ParameterMap, ParseError> {
    let mut map = ParameterMap::new();
    let mut continued: BTreeMap<String, BTreeMap<u32, Fragment>> = BTreeMap::new();
    loop {
        t.skip_cfws()?;
        match t.peek() {
            None => break,
            Some(b';') => {
                t.bump();
                continue;
            }
            Some(_) => {}
        }
        let name = match t.parse_token() {
            Some(name) => bytes_to_string(name),
            None => return Err(t.error(ParseErrorKind::ExpectedToken)),
        };
        t.skip_cfws()?;
        if !t.eat(b'=') {
            log::debug!("parameter {:?} has no value", name);
            skip_value(t);
            continue;
        }
        t.skip_cfws()?;
        let (text, quoted) = if t.peek() == Some(b'"') {
            match t.parse_quoted_string() {
                Ok(text) => (text, true),
                Err(e) => {
                    log::debug!("parameter {:?}: {}", name, e);
                    skip_value(t);
                    continue;
                }
            }
        } else {
            let bare = t.take_while(is_bare_value_char);
            if bare.is_empty() {
                skip_value(t);
                continue;
            }
            if !bare.iter().all(|&b| is_token_char(b)) {
                log::debug!("parameter {:?}: unquoted value is not a token", name);
            }
            (bytes_to_string(bare), false)
        };
        t.skip_cfws()?;
        if !matches!(t.peek(), None | Some(b';')) {
            skip_value(t);
        }

        let (base, section, extended) = split_name(&name);
        match (section, extended) {
            (None, false) => {
                if continued.contains_key(&base) {
                    continue;
                }
                let value = if quoted && text.contains("=?") {
                    decode_encoded_words(&text)
                } else {
                    text
                };
                map.insert(Parameter::new(base, value));
            }
            (section, extended) => {
                continued
                    .entry(base)
                    .or_default()
                    .insert(section.unwrap_or(0), Fragment { extended, text });
            }
        }
    }
    for (name, fragments) in &continued {
        map.insert(merge(name, fragments));
    }
    Ok(map)
}

/// Parse a parameter list (the part of a header value after the first `;`).
pub fn parse_parameter_list(input: &[u8], crlf: bool) -> Result<ParameterMap, ParseError> {
    Ok(parse_all(input, crlf, parameter_list)?.unwrap_or_default())
}

/// RFC 2231 extended value: `charset'language'percent-encoded-bytes`.
pub fn encode_extended_value(value: &[u8], charset: &str, language: Option<&str>) -> String {
    let encoded = Codec::Rfc2231.encode(value, Newline::Lf);
    format!("{}'{}'{}", charset, language.unwrap_or(""), String::from_utf8_lossy(&encoded))
}

/// Render `name=value` for a header: bare token, quoted-string, or RFC 2231 `name*=` for
/// non-ASCII values.
pub fn format_parameter(name: &str, value: &str) -> String {
    if is_token(value) {
        format!("{}={}", name, value)
    } else if value.bytes().all(|b| (b' '..=b'~').contains(&b) || b == b'\t') {
        format!("{}={}", name, quote(value))
    } else {
        format!("{}*={}", name, encode_extended_value(value.as_bytes(), "utf-8", None))
    }
}
