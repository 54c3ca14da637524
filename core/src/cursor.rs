/*
 * cursor.rs
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

//! Position/limit views over caller-owned buffers, shared by the codecs and the tokenizer.

/// Read position over a borrowed byte buffer. Never reads past `limit`.
#[derive(Debug, Clone, Copy)]
pub struct ReadCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            limit: buf.len(),
        }
    }

    /// Cursor over `buf[start..limit]`; both bounds are clamped to the buffer.
    pub fn with_range(buf: &'a [u8], start: usize, limit: usize) -> Self {
        let limit = limit.min(buf.len());
        Self {
            buf,
            pos: start.min(limit),
            limit,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.limit
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Byte `n` positions ahead of the cursor, if inside the limit.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        let i = self.pos.checked_add(n)?;
        if i < self.limit {
            Some(self.buf[i])
        } else {
            None
        }
    }

    /// Consume and return the next byte.
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Advance by up to `n` bytes; returns how many were skipped.
    #[inline]
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.pos += n;
        n
    }

    /// Rewind or move forward to an absolute position. Returns false if out of range.
    pub fn set_position(&mut self, pos: usize) -> bool {
        if pos <= self.limit {
            self.pos = pos;
            true
        } else {
            false
        }
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Unread bytes up to the limit.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..self.limit]
    }

    /// Slice of the underlying buffer, clamped to the limit.
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        let end = end.min(self.limit);
        let start = start.min(end);
        &self.buf[start..end]
    }

    /// Consume bytes while `pred` holds; returns the consumed span.
    pub fn take_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        &self.buf[start..self.pos]
    }
}

/// Write position over a borrowed output window. Writes are bounds-checked before commit.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Write one byte. Returns false, writing nothing, when the window is full.
    #[inline]
    pub fn put(&mut self, b: u8) -> bool {
        match self.buf.get_mut(self.pos) {
            Some(slot) => {
                *slot = b;
                self.pos += 1;
                true
            }
            None => false,
        }
    }

    /// Write as much of `bytes` as fits; returns the count written.
    pub fn put_slice(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
        n
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_cursor_respects_limit() {
        let data = b"hello world";
        let mut c = ReadCursor::with_range(data, 6, 9);
        assert_eq!(c.remaining(), 3);
        assert_eq!(c.next_byte(), Some(b'w'));
        assert_eq!(c.peek_at(1), Some(b'r'));
        assert_eq!(c.peek_at(2), None);
        assert_eq!(c.advance(10), 2);
        assert!(c.is_empty());
        assert_eq!(c.next_byte(), None);
        assert!(!c.set_position(10));
        assert!(c.set_position(7));
        assert_eq!(c.rest(), b"or");
    }

    #[test]
    fn take_while_returns_span() {
        let mut c = ReadCursor::new(b"abc123");
        assert_eq!(c.take_while(|b| b.is_ascii_alphabetic()), b"abc");
        assert_eq!(c.position(), 3);
        assert!(c.starts_with(b"12"));
    }

    #[test]
    fn write_cursor_never_overflows() {
        let mut buf = [0u8; 3];
        let mut w = WriteCursor::new(&mut buf);
        assert!(w.put(b'a'));
        assert_eq!(w.put_slice(b"bcd"), 2);
        assert!(w.is_full());
        assert!(!w.put(b'e'));
        assert_eq!(w.written(), b"abc");
    }
}
