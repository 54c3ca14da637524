/*
 * codec.rs
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

//! Codec descriptors and the resumable encoder/decoder contract.
//!
//! An [`Encoder`] or [`Decoder`] is created per stream with [`Codec::make_encoder`] /
//! [`Codec::make_decoder`], fed through [`Transform::transform`] with whatever input and output
//! windows the caller has (down to one byte each), then drained with [`Transform::finish`]
//! until it returns true. [`Codec::encode`] and [`Codec::decode`] do all of that into a
//! growing `BytesMut`.

use bytes::BytesMut;

use crate::config::Newline;
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::CodecWarning;
use crate::mime::base64::{Base64Decoder, Base64Encoder};
use crate::mime::q_encoding::QEncodingEncoder;
use crate::mime::quoted_printable::{QuotedPrintableDecoder, QuotedPrintableEncoder};

pub(crate) const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes consumed and produced by one `transform` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub read: usize,
    pub written: usize,
}

impl Progress {
    pub(crate) fn since(src_start: usize, dst_start: usize, src: &ReadCursor<'_>, dst: &WriteCursor<'_>) -> Self {
        Self {
            read: src.position() - src_start,
            written: dst.position() - dst_start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.read == 0 && self.written == 0
    }
}

/// Resumable byte transformation.
///
/// `transform` advances both cursors and returns when the input is exhausted, the output
/// window is full, or more input is needed to decide. `finish` flushes pending state and
/// returns true once everything is out; on false the caller supplies a fresh window and calls
/// it again. After `finish` has returned true it keeps returning true and writes nothing.
pub trait Transform {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress;

    fn finish(&mut self, dst: &mut WriteCursor<'_>, newline: Newline) -> bool;

    /// Recoverable anomalies seen so far (capped).
    fn warnings(&self) -> &[CodecWarning] {
        &[]
    }

    /// Total number of anomalies, including those beyond the cap.
    fn warning_count(&self) -> usize {
        self.warnings().len()
    }
}

/// Small output queue that carries multi-byte sequences (escapes, line breaks) across
/// suspensions when the output window fills mid-sequence.
#[derive(Debug, Clone, Default)]
pub(crate) struct Staging {
    buf: [u8; 8],
    start: usize,
    end: usize,
}

impl Staging {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub(crate) fn push(&mut self, b: u8) {
        debug_assert!(self.end < self.buf.len());
        if let Some(slot) = self.buf.get_mut(self.end) {
            *slot = b;
            self.end += 1;
        }
    }

    pub(crate) fn push_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push(b);
        }
    }

    pub(crate) fn push_hex(&mut self, escape: u8, value: u8) {
        self.push(escape);
        self.push(HEX_UPPER[(value >> 4) as usize]);
        self.push(HEX_UPPER[(value & 0x0f) as usize]);
    }

    /// Move staged bytes to `dst`. Returns true when the queue is empty afterwards.
    pub(crate) fn flush(&mut self, dst: &mut WriteCursor<'_>) -> bool {
        while self.start < self.end {
            if !dst.put(self.buf[self.start]) {
                return false;
            }
            self.start += 1;
        }
        self.start = 0;
        self.end = 0;
        true
    }
}

/// Built-in transfer encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// RFC 2045 Base64 with 76-column lines.
    Base64,
    /// RFC 2045 Quoted-Printable.
    QuotedPrintable,
    /// RFC 2047 "B": Base64 without line breaks.
    Rfc2047B,
    /// RFC 2047 "Q".
    Rfc2047Q,
    /// RFC 2231 percent-encoding of extended parameter values.
    Rfc2231,
}

impl Codec {
    pub const ALL: [Codec; 5] = [
        Codec::Base64,
        Codec::QuotedPrintable,
        Codec::Rfc2047B,
        Codec::Rfc2047Q,
        Codec::Rfc2231,
    ];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            Codec::Base64 => "base64",
            Codec::QuotedPrintable => "quoted-printable",
            Codec::Rfc2047B => "B",
            Codec::Rfc2047Q => "Q",
            Codec::Rfc2231 => "x-kmime-rfc2231",
        }
    }

    pub fn make_encoder(self) -> Encoder {
        match self {
            Codec::Base64 => Encoder::Base64(Base64Encoder::new()),
            Codec::Rfc2047B => Encoder::Base64(Base64Encoder::without_line_breaks()),
            Codec::QuotedPrintable => Encoder::QuotedPrintable(QuotedPrintableEncoder::new()),
            Codec::Rfc2047Q => Encoder::QEncoding(QEncodingEncoder::new(b'=')),
            Codec::Rfc2231 => Encoder::QEncoding(QEncodingEncoder::new(b'%')),
        }
    }

    pub fn make_decoder(self) -> Decoder {
        match self {
            Codec::Base64 | Codec::Rfc2047B => Decoder::Base64(Base64Decoder::new()),
            Codec::QuotedPrintable => Decoder::QuotedPrintable(QuotedPrintableDecoder::new(b'=', false)),
            Codec::Rfc2047Q => Decoder::QuotedPrintable(QuotedPrintableDecoder::new(b'=', true)),
            Codec::Rfc2231 => Decoder::QuotedPrintable(QuotedPrintableDecoder::new(b'%', false)),
        }
    }

    /// Upper bound on encoded size for `len` input bytes.
    pub fn max_encoded_len(self, len: usize, newline: Newline) -> usize {
        let nl = newline.as_bytes().len();
        match self {
            Codec::Base64 => {
                let packets = len.div_ceil(3);
                packets * 4 + (packets / 19) * nl
            }
            Codec::Rfc2047B => len.div_ceil(3) * 4,
            Codec::QuotedPrintable => {
                let escaped = len * 3;
                escaped + (escaped / 72 + 1) * (1 + nl)
            }
            Codec::Rfc2047Q | Codec::Rfc2231 => len * 3,
        }
    }

    /// Upper bound on decoded size for `len` input bytes.
    pub fn max_decoded_len(self, len: usize, newline: Newline) -> usize {
        match self {
            Codec::Base64 | Codec::Rfc2047B => len * 3 / 4 + 3,
            Codec::QuotedPrintable => len * newline.as_bytes().len(),
            Codec::Rfc2047Q | Codec::Rfc2231 => len,
        }
    }

    /// Encode a whole buffer.
    pub fn encode(self, input: &[u8], newline: Newline) -> BytesMut {
        let mut encoder = self.make_encoder();
        drive(&mut encoder, input, newline, self.max_encoded_len(input.len(), newline))
    }

    /// Decode a whole buffer, collecting warnings.
    pub fn decode(self, input: &[u8], newline: Newline) -> Decoded {
        let mut decoder = self.make_decoder();
        let data = drive(&mut decoder, input, newline, self.max_decoded_len(input.len(), newline));
        Decoded {
            data,
            warnings: decoder.warnings().to_vec(),
            warning_count: decoder.warning_count(),
        }
    }
}

/// Result of a one-shot decode.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub data: BytesMut,
    pub warnings: Vec<CodecWarning>,
    pub warning_count: usize,
}

const WINDOW: usize = 1024;

/// Feed `input` through `stream` in fixed windows, then finish it.
fn drive<T: Transform>(stream: &mut T, input: &[u8], newline: Newline, capacity: usize) -> BytesMut {
    let mut out = BytesMut::with_capacity(capacity);
    let mut src = ReadCursor::new(input);
    let mut window = [0u8; WINDOW];
    while !src.is_empty() {
        let mut dst = WriteCursor::new(&mut window);
        let progress = stream.transform(&mut src, &mut dst, newline);
        out.extend_from_slice(dst.written());
        if progress.is_empty() {
            log::error!("codec made no progress with {} bytes left", src.remaining());
            break;
        }
    }
    loop {
        let mut dst = WriteCursor::new(&mut window);
        let done = stream.finish(&mut dst, newline);
        out.extend_from_slice(dst.written());
        if done || dst.position() == 0 {
            break;
        }
    }
    out
}

/// Encoder for one stream.
#[derive(Debug, Clone)]
pub enum Encoder {
    Base64(Base64Encoder),
    QuotedPrintable(QuotedPrintableEncoder),
    QEncoding(QEncodingEncoder),
}

impl Transform for Encoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress {
        match self {
            Encoder::Base64(e) => e.transform(src, dst, newline),
            Encoder::QuotedPrintable(e) => e.transform(src, dst, newline),
            Encoder::QEncoding(e) => e.transform(src, dst, newline),
        }
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, newline: Newline) -> bool {
        match self {
            Encoder::Base64(e) => e.finish(dst, newline),
            Encoder::QuotedPrintable(e) => e.finish(dst, newline),
            Encoder::QEncoding(e) => e.finish(dst, newline),
        }
    }
}

/// Decoder for one stream.
#[derive(Debug, Clone)]
pub enum Decoder {
    Base64(Base64Decoder),
    QuotedPrintable(QuotedPrintableDecoder),
}

impl Transform for Decoder {
    fn transform(&mut self, src: &mut ReadCursor<'_>, dst: &mut WriteCursor<'_>, newline: Newline) -> Progress {
        match self {
            Decoder::Base64(d) => d.transform(src, dst, newline),
            Decoder::QuotedPrintable(d) => d.transform(src, dst, newline),
        }
    }

    fn finish(&mut self, dst: &mut WriteCursor<'_>, newline: Newline) -> bool {
        match self {
            Decoder::Base64(d) => d.finish(dst, newline),
            Decoder::QuotedPrintable(d) => d.finish(dst, newline),
        }
    }

    fn warnings(&self) -> &[CodecWarning] {
        match self {
            Decoder::Base64(d) => d.warnings(),
            Decoder::QuotedPrintable(d) => d.warnings(),
        }
    }

    fn warning_count(&self) -> usize {
        match self {
            Decoder::Base64(d) => d.warning_count(),
            Decoder::QuotedPrintable(d) => d.warning_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive with tiny windows on both sides to exercise every suspension point.
    fn drive_tiny<T: Transform>(stream: &mut T, input: &[u8], newline: Newline, in_step: usize, out_step: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut pos = 0;
        let mut window = vec![0u8; out_step];
        while pos < input.len() {
            let end = (pos + in_step).min(input.len());
            let mut src = ReadCursor::with_range(input, pos, end);
            while !src.is_empty() {
                let mut dst = WriteCursor::new(&mut window);
                stream.transform(&mut src, &mut dst, newline);
                out.extend_from_slice(dst.written());
            }
            pos = end;
        }
        loop {
            let mut dst = WriteCursor::new(&mut window);
            let done = stream.finish(&mut dst, newline);
            out.extend_from_slice(dst.written());
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn staging_survives_full_window() {
        let mut staging = Staging::default();
        staging.push_hex(b'=', 0xC3);
        let mut buf = [0u8; 2];
        let mut dst = WriteCursor::new(&mut buf);
        assert!(!staging.flush(&mut dst));
        assert_eq!(dst.written(), b"=C");
        let mut buf = [0u8; 2];
        let mut dst = WriteCursor::new(&mut buf);
        assert!(staging.flush(&mut dst));
        assert_eq!(dst.written(), b"3");
        assert!(staging.is_empty());
    }

    #[test]
    fn one_byte_windows_match_one_shot() {
        let input = b"Caf\xc3\xa9 = cr\xc3\xa8me br\xc3\xbbl\xc3\xa9e\nsecond line with trailing space \nend";
        for codec in Codec::ALL {
            for newline in [Newline::Lf, Newline::CrLf] {
                let whole = codec.encode(input, newline);
                let mut encoder = codec.make_encoder();
                let tiny = drive_tiny(&mut encoder, input, newline, 1, 1);
                assert_eq!(&whole[..], &tiny[..], "{} encode", codec.name());

                let decoded = codec.decode(&whole, newline);
                let mut decoder = codec.make_decoder();
                let tiny = drive_tiny(&mut decoder, &whole, newline, 1, 1);
                assert_eq!(&decoded.data[..], &tiny[..], "{} decode", codec.name());
            }
        }
    }

    #[test]
    fn odd_windows_round_trip() {
        let input: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        for codec in [Codec::Base64, Codec::QuotedPrintable, Codec::Rfc2047B] {
            for (i, o) in [(3, 5), (7, 2), (64, 1), (1, 64)] {
                let mut encoder = codec.make_encoder();
                let encoded = drive_tiny(&mut encoder, &input, Newline::CrLf, i, o);
                let mut decoder = codec.make_decoder();
                let decoded = drive_tiny(&mut decoder, &encoded, Newline::CrLf, o, i);
                assert_eq!(decoded, input, "{} with windows {}/{}", codec.name(), i, o);
            }
        }
    }

    #[test]
    fn finish_is_idempotent() {
        for codec in Codec::ALL {
            let mut encoder = codec.make_encoder();
            let mut src = ReadCursor::new(b"ab");
            let mut buf = [0u8; 64];
            let mut dst = WriteCursor::new(&mut buf);
            encoder.transform(&mut src, &mut dst, Newline::Lf);
            assert!(encoder.finish(&mut dst, Newline::Lf));
            let written = dst.position();
            assert!(encoder.finish(&mut dst, Newline::Lf));
            assert_eq!(dst.position(), written, "{}", codec.name());
        }
    }

    #[test]
    fn max_lengths_are_upper_bounds() {
        let input: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        for codec in Codec::ALL {
            for newline in [Newline::Lf, Newline::CrLf] {
                let encoded = codec.encode(&input, newline);
                assert!(encoded.len() <= codec.max_encoded_len(input.len(), newline), "{}", codec.name());
                let decoded = codec.decode(&encoded, newline);
                assert!(decoded.data.len() <= codec.max_decoded_len(encoded.len(), newline));
            }
        }
    }
}
