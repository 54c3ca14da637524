/*
 * mod.rs
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

//! MIME transfer codecs and structured header fields.

pub mod base64;
pub mod codec;
mod content_disposition;
mod content_type;
mod parameter;
pub mod q_encoding;
pub mod quoted_printable;
pub mod registry;
pub mod rfc2047;
pub mod rfc5322;
mod simple_fields;
pub mod token;
pub mod tokenizer;
pub mod utils;

pub use codec::{Codec, Decoded, Decoder, Encoder, Progress, Transform};
pub use content_disposition::{content_disposition, parse_content_disposition, ContentDisposition};
pub use content_type::{content_type, parse_content_type, ContentType};
pub use parameter::{
    encode_extended_value, format_parameter, parameter_list, parse_parameter_list, Parameter, ParameterMap,
};
pub use rfc2047::{decode_encoded_words, decode_unstructured, encode_word, DecodedText, EncodedWord};
pub use rfc5322::{AddrSpec, Address, Mailbox, ObsoleteStructureType};
pub use simple_fields::{
    dot_atom_field, parse_dot_atom_field, parse_token_field, parse_transfer_encoding, token_field,
};
pub use token::{Token, TokenKind, TokenMask, TokenValue};
pub use tokenizer::Tokenizer;
pub use utils::{is_token, is_token_char};
