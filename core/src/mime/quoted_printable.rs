/*
 * quoted_printable.rs
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

//! Quoted-Printable encoder and decoder (RFC 2045). The decoder also serves RFC 2047 "Q"
//! (Q-mode, `_` is a space) and RFC 2231 (escape byte `%`).

use std::collections::VecDeque;

use crate::config::Newline;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{CodecWarning, Warnings};
use crate::mime::codec::{Progress, Staging, Transform, HEX_UPPER};

const HEX_DECODE: [i8; 256] = {
    let mut t = [-1i8; 256];
    let mut i = 0u8;
    while i < 10 {
        t[(b'0' + i) as usize] = i as i8;
        i = i.wrapping_add(1);
    }
    let mut i = 0u8;
    while i < 6 {
        t[(b'A' + i) as usize] = (10 + i) as i8;
        t[(b'a' + i) as usize] = (10 + i) as i8;
        i = i.wrapping_add(1);
    }
    t
};

/// Bytes re-emitted after a malformed escape: printable ASCII except `=`.
#[inline]
fn is_flushable(b: u8) -> bool {
    (b'>'..=b'~').contains(&b) || (b'!'..=b'<').contains(&b)
}

/// Resumable Quoted-Printable decoder.
///
/// Soft line breaks are removed, hard line breaks come out in the caller's line mode.
/// A malformed escape is not fatal: the escape byte, any pending high nibble and the
/// offending byte (if printable) are written through literally.
#[derive(Debug, Clone)]
pub struct QuotedPrintableDecoder {
    escape: u8,
    q_mode: bool,
    accu: u8,
    have_accu: bool,
    inside_hex: bool,
    flushing: bool,
    bad_char: Option<u8>,
    expect_lf: bool,
    /// Second half of a CRLF when the window filled after the CR.
    pending_lf: bool,
    finished: bool,
    warnings: Warnings,
}

impl QuotedPrintableDecoder {
    pub fn new(escape: u8, q_mode: bool) -> Self {
        Self {
            escape,
            q_mode,
            accu: 0,
            have_accu: false,
            inside_hex: false,
            flushing: false,
            bad_char: None,
            expect_lf: false,
            pending_lf: false,
            finished: false,
            warnings: Warnings::default(),
        }
    }

    fn name(&self) -> &'static str {
        match (self.escape, self.q_mode) {
            (b'=', false) => "quoted-printable",
            (b'=', true) => "Q",
            _ => "rfc2231",
        }
    }

    fn warn(&mut self, warning: CodecWarning) {
        let name = self.name();
        self.warnings.record(name, warning);
    }

    /// Emit the next piece of a malformed escape: escape byte, high nibble, offending byte.
    fn flush_step(&mut self, dst: &mut WriteCursor<'_>) {
        if self.inside_hex {
            dst.put(self.escape);
            self.inside_hex = false;
        } else if self.have_accu {
            dst.put(HEX_UPPER[(self.accu >> 4) as usize]);
            self.have_accu = false;
            self.accu = 0;
        } else {
            if let Some(b) = self.bad_char.take() {
                if is_flushable(b) {
                    dst.put(b);
                }
            }
            self.flushing = false;
        }
    }

    fn put_newline(&mut self, dst: &mut WriteCursor<'_>, newline: Newline) {
        match newline {
            Newline::Lf => {
                dst.put(b'\n');
            }
            Newline::CrLf => {
                dst.put(b'\r');
                self.pending_lf = true;
            }
        }
    }
}

impl Transform for QuotedPrintableDecoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress {
        let (src_start, dst_start) = (src.position(), dst.position());
        while !dst.is_full() {
            if self.pending_lf {
                dst.put(b'\n');
                self.pending_lf = false;
                continue;
            }
            if self.flushing {
                self.flush_step(dst);
                continue;
            }
            let Some(ch) = src.next_byte() else {
                break;
            };
            if self.expect_lf && ch != b'\n' {
                self.warn(CodecWarning::LoneCarriageReturn);
                self.inside_hex = false;
                self.expect_lf = false;
            }
            if self.inside_hex {
                let value = HEX_DECODE[ch as usize];
                if value < 0 {
                    match ch {
                        b'\r' => self.expect_lf = true,
                        b'\n' if !self.have_accu => {
                            // soft line break
                            self.expect_lf = false;
                            self.inside_hex = false;
                        }
                        _ => {
                            self.warn(CodecWarning::MalformedEscape);
                            self.expect_lf = false;
                            self.bad_char = Some(ch);
                            self.flushing = true;
                        }
                    }
                    continue;
                }
                let value = value as u8;
                if self.have_accu {
                    dst.put(self.accu | value);
                    self.accu = 0;
                    self.have_accu = false;
                    self.inside_hex = false;
                } else {
                    self.accu = value << 4;
                    self.have_accu = true;
                }
            } else if (b' '..=b'~').contains(&ch) || ch == b'\t' {
                if ch == self.escape {
                    self.inside_hex = true;
                } else if self.q_mode && ch == b'_' {
                    dst.put(b' ');
                } else {
                    dst.put(ch);
                }
            } else if ch == b'\n' {
                self.expect_lf = false;
                self.put_newline(dst, newline);
            } else if ch == b'\r' {
                self.expect_lf = true;
            } else {
                self.warn(CodecWarning::IllegalByte(ch));
            }
        }
        Progress::since(src_start, dst_start, src, dst)
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, _newline: Newline) -> bool {
        if !self.finished {
            self.finished = true;
            if self.expect_lf && !self.inside_hex {
                self.warn(CodecWarning::LoneCarriageReturn);
            }
            self.expect_lf = false;
            if self.inside_hex && !self.flushing {
                self.warn(CodecWarning::UnterminatedEscape);
                self.flushing = true;
            }
        }
        loop {
            if self.pending_lf {
                if !dst.put(b'\n') {
                    return false;
                }
                self.pending_lf = false;
            }
            if !self.flushing {
                return true;
            }
            if dst.is_full() {
                return false;
            }
            self.flush_step(dst);
        }
    }

    fn warnings(&self) -> &[CodecWarning] {
        self.warnings.as_slice()
    }

    fn warning_count(&self) -> usize {
        self.warnings.total()
    }
}

const MAX_LINE_LEN: usize = 76;
/// Usable lookahead.
const LOOKAHEAD: usize = 15;
/// Bytes that must be buffered before one is emitted while no line end is in sight.
const MIN_LOOKAHEAD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Never,
    AtBeginningOfLine,
    Definitely,
}

#[inline]
fn needs_encoding(ch: u8) -> bool {
    ch > b'~' || (ch < b' ' && ch != b'\t') || ch == b'='
}

/// Resumable Quoted-Printable encoder.
///
/// Line ends follow the line mode: with `Newline::Lf` only LF ends a line and CR is data;
/// with `Newline::CrLf` only CRLF ends a line and a lone LF is data. Either way the output
/// decodes back to the exact input in the same mode.
#[derive(Debug, Clone)]
pub struct QuotedPrintableEncoder {
    input: VecDeque<u8>,
    /// The line held in `input` was terminated by a line end already consumed from the source.
    saw_line_end: bool,
    /// The last byte pushed into `input` was a CR (CRLF mode).
    saw_cr: bool,
    line_len: usize,
    finishing: bool,
    staging: Staging,
}

impl Default for QuotedPrintableEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotedPrintableEncoder {
    pub fn new() -> Self {
        Self {
            input: VecDeque::with_capacity(LOOKAHEAD + 1),
            saw_line_end: false,
            saw_cr: false,
            line_len: 0,
            finishing: false,
            staging: Staging::default(),
        }
    }

    fn fill_input(&mut self, src: &mut ReadCursor<'_>, newline: Newline) {
        if self.saw_line_end {
            return;
        }
        while self.input.len() < LOOKAHEAD {
            let Some(ch) = src.next_byte() else {
                return;
            };
            match newline {
                Newline::Lf => {
                    if ch == b'\n' {
                        self.saw_line_end = true;
                        return;
                    }
                }
                Newline::CrLf => {
                    if ch == b'\n' && self.saw_cr && self.input.back() == Some(&b'\r') {
                        self.input.pop_back();
                        self.saw_cr = false;
                        self.saw_line_end = true;
                        return;
                    }
                    self.saw_cr = ch == b'\r';
                }
            }
            self.input.push_back(ch);
        }
    }

    /// Stage the next buffered byte (plus a soft break if needed). Returns false when the
    /// lookahead is too short to decide.
    fn stage_next(&mut self, newline: Newline) -> bool {
        let line_ends_in_buffer = self.saw_line_end || self.finishing;
        if !line_ends_in_buffer && self.input.len() < MIN_LOOKAHEAD {
            return false;
        }
        let Some(ch) = self.input.pop_front() else {
            return false;
        };
        let last_on_line = line_ends_in_buffer && self.input.is_empty();
        let encoding = if needs_encoding(ch) || (last_on_line && (ch == b' ' || ch == b'\t')) {
            Encoding::Definitely
        } else if matches!(ch, b'-' | b'F' | b'.') {
            Encoding::AtBeginningOfLine
        } else {
            Encoding::Never
        };

        let mut needed = if encoding == Encoding::Definitely { 3 } else { 1 };
        if !last_on_line {
            // room for the soft break's '='
            needed += 1;
        }
        if self.line_len > MAX_LINE_LEN - needed {
            self.staging.push(b'=');
            self.staging.push_slice(newline.as_bytes());
            self.line_len = 0;
        }

        if encoding == Encoding::Never || (encoding == Encoding::AtBeginningOfLine && self.line_len != 0) {
            self.staging.push(ch);
            self.line_len += 1;
        } else {
            self.staging.push_hex(b'=', ch);
            self.line_len += 3;
        }
        true
    }

    /// Stage the next output unit. Returns false when nothing more can be produced without input.
    fn step(&mut self, newline: Newline) -> bool {
        if self.stage_next(newline) {
            return true;
        }
        if self.saw_line_end && self.input.is_empty() {
            self.staging.push_slice(newline.as_bytes());
            self.saw_line_end = false;
            self.line_len = 0;
            return true;
        }
        false
    }
}

impl Transform for QuotedPrintableEncoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress {
        let (src_start, dst_start) = (src.position(), dst.position());
        if self.finishing {
            log::warn!("quoted-printable encoder: input after finish ignored");
            return Progress::default();
        }
        while !dst.is_full() {
            if !self.staging.is_empty() {
                self.staging.flush(dst);
                continue;
            }
            self.fill_input(src, newline);
            if !self.step(newline) {
                break;
            }
        }
        Progress::since(src_start, dst_start, src, dst)
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, newline: Newline) -> bool {
        self.finishing = true;
        loop {
            if !self.staging.flush(dst) {
                return false;
            }
            if !self.step(newline) {
                return true;
            }
        }
    }
}
