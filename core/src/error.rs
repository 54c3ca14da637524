/*
 * error.rs
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

//! Parse errors and recoverable codec warnings.

use thiserror::Error;

/// What went wrong while parsing a structured header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected byte")]
    UnexpectedByte,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated quoted-string")]
    UnterminatedQuotedString,
    #[error("unterminated domain-literal")]
    UnterminatedDomainLiteral,
    #[error("expected a word")]
    ExpectedWord,
    #[error("expected '@'")]
    ExpectedAt,
    #[error("expected a domain")]
    ExpectedDomain,
    #[error("expected '>'")]
    ExpectedAngleClose,
    #[error("expected ';' ending the group")]
    ExpectedGroupEnd,
    #[error("expected a token")]
    ExpectedToken,
    #[error("expected '/'")]
    ExpectedSlash,
    #[error("expected ';'")]
    ExpectedSemicolon,
    #[error("expected '='")]
    ExpectedEquals,
    #[error("trailing garbage")]
    TrailingGarbage,
}

/// A parse failure and the byte offset of the first unrecoverable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Recoverable anomaly seen by a decoder. Decoding continues after each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecWarning {
    #[error("unexpected padding character in input stream")]
    UnexpectedPadding,
    #[error("data after padding was dropped")]
    EmbeddedPadding,
    #[error("input ended inside a base64 quantum")]
    TruncatedQuantum,
    #[error("illegally formed hex escape")]
    MalformedEscape,
    #[error("lone CR or malformed soft line break")]
    LoneCarriageReturn,
    #[error("illegal byte {0:#04x} in input stream")]
    IllegalByte(u8),
    #[error("input ended inside an escape sequence")]
    UnterminatedEscape,
}

/// Most warnings kept per decoder; later ones are only counted.
pub const MAX_WARNINGS: usize = 32;

/// Warning sink owned by a decoder.
#[derive(Debug, Clone, Default)]
pub(crate) struct Warnings {
    list: Vec<CodecWarning>,
    total: usize,
}

impl Warnings {
    pub(crate) fn record(&mut self, codec: &str, warning: CodecWarning) {
        self.total += 1;
        if self.list.len() < MAX_WARNINGS {
            log::warn!("{} decoder: {}", codec, warning);
            self.list.push(warning);
        }
    }

    pub(crate) fn as_slice(&self) -> &[CodecWarning] {
        &self.list
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }
}
