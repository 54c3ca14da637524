/*
 * lib.rs
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

//! Streaming MIME transfer codecs and structured header parsing.
//!
//! Two halves share the cursor types in [`cursor`]:
//! - resumable encoders/decoders for Base64, Quoted-Printable, RFC 2047 B/Q and RFC 2231
//!   (see [`mime::codec`] and [`mime::registry`]);
//! - a CFWS-aware header tokenizer ([`mime::tokenizer`]) and the address, identifier and
//!   parameter parsers built on it.

pub mod config;
pub mod cursor;
pub mod error;
pub mod mime;

pub use config::{HeaderConfig, Newline};
pub use cursor::{ReadCursor, WriteCursor};
pub use error::{CodecWarning, ParseError, ParseErrorKind};
