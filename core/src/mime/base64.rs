/*
 * base64.rs
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

//! Base64 encoder and decoder for Content-Transfer-Encoding (RFC 2045) and RFC 2047 "B" words.

use std::sync::OnceLock;

use crate::config::Newline;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{CodecWarning, Warnings};
use crate::mime::codec::{Progress, Staging, Transform};

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Quartets per output line (76 columns).
const QUARTETS_PER_LINE: usize = 19;

const INVALID: i8 = -1;

fn decode_table() -> &'static [i8; 256] {
    static TABLE: OnceLock<[i8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = [INVALID; 256];
        for (i, &c) in ALPHABET.iter().enumerate() {
            t[c as usize] = i as i8;
        }
        t
    })
}

/// Resumable Base64 decoder.
///
/// Bytes outside the alphabet (whitespace, line breaks, junk) are skipped. Padding ends the
/// data; anything after it is consumed without output.
#[derive(Debug, Clone, Default)]
pub struct Base64Decoder {
    /// Position inside the current quartet (0..=3).
    step: u8,
    /// Bits of the next output byte collected so far.
    out_bits: u8,
    saw_padding: bool,
    warned_embedded: bool,
    finished: bool,
    warnings: Warnings,
}

impl Base64Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn padding(&mut self) {
        match self.step {
            0 | 1 => {
                if !self.saw_padding {
                    self.warnings.record("base64", CodecWarning::UnexpectedPadding);
                }
            }
            2 => self.step = 3,
            _ => {}
        }
        self.saw_padding = true;
    }
}

impl Transform for Base64Decoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, _newline: Newline) -> Progress {
        let (src_start, dst_start) = (src.position(), dst.position());
        let table = decode_table();
        while !dst.is_full() {
            let Some(ch) = src.next_byte() else {
                break;
            };
            if ch == b'=' {
                self.padding();
                continue;
            }
            let value = table[ch as usize];
            if value == INVALID {
                continue;
            }
            if self.saw_padding {
                if !self.warned_embedded {
                    self.warned_embedded = true;
                    self.warnings.record("base64", CodecWarning::EmbeddedPadding);
                }
                continue;
            }
            let value = value as u8;
            match self.step {
                0 => {
                    self.out_bits = value << 2;
                }
                1 => {
                    dst.put(self.out_bits | (value >> 4));
                    self.out_bits = value << 4;
                }
                2 => {
                    dst.put(self.out_bits | (value >> 2));
                    self.out_bits = value << 6;
                }
                _ => {
                    dst.put(self.out_bits | value);
                    self.out_bits = 0;
                }
            }
            self.step = (self.step + 1) % 4;
        }
        Progress::since(src_start, dst_start, src, dst)
    }

    fn finish(&mut self, _dst: &mut WriteCursor<'_>, _newline: Newline) -> bool {
        if !self.finished {
            self.finished = true;
            // A lone sextet cannot form a byte.
            if self.step == 1 && !self.saw_padding {
                self.warnings.record("base64", CodecWarning::TruncatedQuantum);
            }
        }
        true
    }

    fn warnings(&self) -> &[CodecWarning] {
        self.warnings.as_slice()
    }

    fn warning_count(&self) -> usize {
        self.warnings.total()
    }
}

/// Resumable Base64 encoder. Breaks lines after 19 quartets unless built with
/// [`Base64Encoder::without_line_breaks`].
#[derive(Debug, Clone)]
pub struct Base64Encoder {
    line_breaks: bool,
    /// 0..=3; at step 3 three input bytes are in and the fourth symbol is pending.
    step: u8,
    next_bits: u8,
    quartets_on_line: usize,
    finishing: bool,
    staging: Staging,
}

impl Default for Base64Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Base64Encoder {
    pub fn new() -> Self {
        Self {
            line_breaks: true,
            step: 0,
            next_bits: 0,
            quartets_on_line: 0,
            finishing: false,
            staging: Staging::default(),
        }
    }

    pub fn without_line_breaks() -> Self {
        Self {
            line_breaks: false,
            ..Self::new()
        }
    }
}

impl Transform for Base64Encoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress {
        let (src_start, dst_start) = (src.position(), dst.position());
        if self.finishing {
            log::warn!("base64 encoder: input after finish ignored");
            return Progress::default();
        }
        while !src.is_empty() {
            if !self.staging.flush(dst) || dst.is_full() {
                break;
            }
            // Line breaks go in lazily, only once more data is known to follow.
            if self.line_breaks && self.step == 0 && self.quartets_on_line >= QUARTETS_PER_LINE {
                self.staging.push_slice(newline.as_bytes());
                self.quartets_on_line = 0;
                continue;
            }
            let value = match self.step {
                0 => {
                    let Some(ch) = src.next_byte() else { break };
                    self.next_bits = (ch & 0x03) << 4;
                    ch >> 2
                }
                1 => {
                    let Some(ch) = src.next_byte() else { break };
                    let v = self.next_bits | (ch >> 4);
                    self.next_bits = (ch & 0x0f) << 2;
                    v
                }
                2 => {
                    let Some(ch) = src.next_byte() else { break };
                    let v = self.next_bits | (ch >> 6);
                    self.next_bits = ch & 0x3f;
                    v
                }
                _ => {
                    let v = self.next_bits;
                    self.next_bits = 0;
                    self.quartets_on_line += 1;
                    v
                }
            };
            dst.put(ALPHABET[value as usize]);
            self.step = (self.step + 1) % 4;
        }
        Progress::since(src_start, dst_start, src, dst)
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, _newline: Newline) -> bool {
        if !self.staging.flush(dst) {
            return false;
        }
        if !self.finishing {
            if self.step != 0 {
                if !dst.put(ALPHABET[self.next_bits as usize]) {
                    return false;
                }
                self.next_bits = 0;
                self.step = (self.step + 1) % 4;
            }
            self.finishing = true;
        }
        while self.step != 0 {
            if !dst.put(b'=') {
                return false;
            }
            self.step = (self.step + 1) % 4;
        }
        true
    }
}
