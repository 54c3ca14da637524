/*
 * config.rs
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

//! Line-ending mode for codecs and the options used when decoding header text.

/// Line-ending convention for codec output (and, for the QP encoder, input line ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Newline {
    /// Bare LF, the in-memory convention.
    #[default]
    Lf,
    /// CRLF, the wire convention.
    CrLf,
}

impl Newline {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Newline::Lf => b"\n",
            Newline::CrLf => b"\r\n",
        }
    }

    pub fn is_crlf(self) -> bool {
        self == Newline::CrLf
    }

    /// Newline for a header flag: `true` means the input is already canonicalized to CRLF.
    pub fn from_crlf(crlf: bool) -> Self {
        if crlf {
            Newline::CrLf
        } else {
            Newline::Lf
        }
    }
}

/// Charset used for raw header bytes when the caller supplies none.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Options for decoding header text.
///
/// `crlf` declares that the input has been canonicalized to CRLF line ends, so that only
/// CRLF followed by whitespace counts as a fold. `default_charset` governs raw bytes outside
/// encoded words; with `force_charset` it overrides the charset declared by encoded words too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    pub crlf: bool,
    pub default_charset: String,
    pub force_charset: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            crlf: false,
            default_charset: DEFAULT_CHARSET.to_string(),
            force_charset: false,
        }
    }
}

impl HeaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    pub fn with_default_charset(mut self, charset: impl Into<String>) -> Self {
        self.default_charset = charset.into();
        self
    }

    pub fn with_force_charset(mut self, force: bool) -> Self {
        self.force_charset = force;
        self
    }

    /// Charset that applies to an encoded word declaring `declared`.
    pub fn effective_charset<'a>(&'a self, declared: &'a str) -> &'a str {
        if self.force_charset || declared.is_empty() {
            &self.default_charset
        } else {
            declared
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_bytes() {
        assert_eq!(Newline::Lf.as_bytes(), b"\n");
        assert_eq!(Newline::CrLf.as_bytes(), b"\r\n");
        assert_eq!(Newline::from_crlf(true), Newline::CrLf);
        assert_eq!(Newline::default(), Newline::Lf);
    }

    #[test]
    fn force_charset_overrides_declared() {
        let config = HeaderConfig::new().with_default_charset("iso-8859-1");
        assert_eq!(config.effective_charset("utf-8"), "utf-8");
        let forced = config.with_force_charset(true);
        assert_eq!(forced.effective_charset("utf-8"), "iso-8859-1");
    }
}
