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

//! C FFI for tagliacarte MIME codecs and header parsers.
//! Codec names and charsets are UTF-8 NUL-terminated strings; data and header values are
//! (pointer, length) byte spans. Returned strings are freed with tagliacarte_mime_free_string,
//! returned buffers with tagliacarte_mime_free_buffer. Failures return NULL, 0 or -1 and set
//! tagliacarte_mime_last_error.

use libc::{c_char, c_int, size_t};
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::fmt::Display;
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tagliacarte_mime::mime::rfc5322::{parse_address_list, parse_message_id_list};
use tagliacarte_mime::mime::{decode_unstructured, parse_parameter_list, registry, Codec, Decoder, Encoder, Transform};
use tagliacarte_mime::{HeaderConfig, Newline, ReadCursor, WriteCursor};

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> = std::cell::RefCell::new(None);
}

fn set_last_error(err: impl Display) {
    let msg = CString::new(err.to_string()).unwrap_or_else(|_| CString::from(c"(error)"));
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

fn ptr_to_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

/// View a C byte span. NULL is only accepted with length 0.
unsafe fn byte_span<'a>(data: *const u8, len: size_t) -> Option<&'a [u8]> {
    if data.is_null() {
        return (len == 0).then_some(&[][..]);
    }
    Some(std::slice::from_raw_parts(data, len))
}

fn lookup_codec(name: *const c_char) -> Option<Codec> {
    let Some(name) = ptr_to_str(name) else {
        set_last_error("codec name is NULL or not UTF-8");
        return None;
    };
    let codec = registry::lookup(&name);
    if codec.is_none() {
        set_last_error(format!("unknown codec: {}", name));
    }
    codec
}

fn newline(crlf: c_int) -> Newline {
    Newline::from_crlf(crlf != 0)
}

fn into_c_buffer(data: Vec<u8>, out_len: *mut size_t) -> *mut u8 {
    let boxed = data.into_boxed_slice();
    if !out_len.is_null() {
        unsafe { *out_len = boxed.len() };
    }
    Box::into_raw(boxed) as *mut u8
}

fn into_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

fn into_json<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => into_c_string(json),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Version string (static, do not free).
#[no_mangle]
pub extern "C" fn tagliacarte_mime_version() -> *const c_char {
    b"0.1.0\0".as_ptr() as *const c_char
}

/// Last error message from a failed call. Valid until next FFI call. Do not free.
#[no_mangle]
pub extern "C" fn tagliacarte_mime_last_error() -> *const c_char {
    LAST_ERROR.with(|e| e.borrow().as_ref().map(|s| s.as_ptr()).unwrap_or(ptr::null()))
}

/// Free a string returned by this library. No-op if ptr is NULL.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

/// Free a buffer returned by tagliacarte_mime_encode or tagliacarte_mime_decode. len is the
/// length reported with it.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_free_buffer(ptr: *mut u8, len: size_t) {
    if !ptr.is_null() {
        let _ = Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len));
    }
}

/// 1 if a codec with this name (case-insensitive) is registered, else 0.
#[no_mangle]
pub extern "C" fn tagliacarte_mime_codec_exists(name: *const c_char) -> c_int {
    ptr_to_str(name).and_then(|n| registry::lookup(&n)).is_some() as c_int
}

/// One-shot encode. Returns a buffer of *out_len bytes, or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_encode(
    codec: *const c_char,
    data: *const u8,
    len: size_t,
    crlf: c_int,
    out_len: *mut size_t,
) -> *mut u8 {
    clear_last_error();
    let Some(codec) = lookup_codec(codec) else {
        return ptr::null_mut();
    };
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    into_c_buffer(codec.encode(input, newline(crlf)).to_vec(), out_len)
}

/// One-shot decode. Malformed input is decoded leniently; the number of warnings is stored
/// in *out_warnings when it is not NULL. Returns a buffer of *out_len bytes, or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_decode(
    codec: *const c_char,
    data: *const u8,
    len: size_t,
    crlf: c_int,
    out_len: *mut size_t,
    out_warnings: *mut size_t,
) -> *mut u8 {
    clear_last_error();
    let Some(codec) = lookup_codec(codec) else {
        return ptr::null_mut();
    };
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    let decoded = codec.decode(input, newline(crlf));
    if !out_warnings.is_null() {
        *out_warnings = decoded.warning_count;
    }
    into_c_buffer(decoded.data.to_vec(), out_len)
}

enum Stream {
    Encoder(Encoder),
    Decoder(Decoder),
}

impl Stream {
    fn as_transform(&mut self) -> &mut dyn Transform {
        match self {
            Stream::Encoder(e) => e,
            Stream::Decoder(d) => d,
        }
    }
}

struct StreamHolder {
    stream: Stream,
    newline: Newline,
}

/// Open streams keyed by handle. Handles start at 1; 0 is never issued.
struct Streams {
    open: Mutex<HashMap<u64, StreamHolder>>,
    counter: AtomicU64,
}

fn streams() -> &'static Streams {
    static STREAMS: once_cell::sync::OnceCell<Streams> = once_cell::sync::OnceCell::new();
    STREAMS.get_or_init(|| Streams {
        open: Mutex::new(HashMap::new()),
        counter: AtomicU64::new(0),
    })
}

fn with_stream<R>(handle: u64, f: impl FnOnce(&mut StreamHolder) -> R) -> Option<R> {
    let Ok(mut open) = streams().open.lock() else {
        set_last_error("stream table poisoned");
        return None;
    };
    match open.get_mut(&handle) {
        Some(holder) => Some(f(holder)),
        None => {
            set_last_error(format!("no such stream: {}", handle));
            None
        }
    }
}

/// Create a streaming encoder (encode != 0) or decoder. Returns a handle, or 0 on error.
/// Free with tagliacarte_mime_stream_free.
#[no_mangle]
pub extern "C" fn tagliacarte_mime_stream_new(codec: *const c_char, encode: c_int, crlf: c_int) -> u64 {
    clear_last_error();
    let Some(codec) = lookup_codec(codec) else {
        return 0;
    };
    let stream = if encode != 0 {
        Stream::Encoder(codec.make_encoder())
    } else {
        Stream::Decoder(codec.make_decoder())
    };
    let s = streams();
    let handle = s.counter.fetch_add(1, Ordering::Relaxed) + 1;
    match s.open.lock() {
        Ok(mut open) => {
            open.insert(handle, StreamHolder { stream, newline: newline(crlf) });
            handle
        }
        Err(_) => {
            set_last_error("stream table poisoned");
            0
        }
    }
}

/// Feed src to the stream, writing at most dst_cap bytes to dst. Bytes consumed and produced
/// go to *out_read and *out_written. Returns 0, or -1 on error. Call again with the unconsumed
/// input when the output window filled up.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_stream_transform(
    handle: u64,
    src: *const u8,
    src_len: size_t,
    dst: *mut u8,
    dst_cap: size_t,
    out_read: *mut size_t,
    out_written: *mut size_t,
) -> c_int {
    clear_last_error();
    let Some(input) = byte_span(src, src_len) else {
        set_last_error("src is NULL");
        return -1;
    };
    if dst.is_null() && dst_cap > 0 {
        set_last_error("dst is NULL");
        return -1;
    }
    let output: &mut [u8] = if dst_cap == 0 { &mut [] } else { std::slice::from_raw_parts_mut(dst, dst_cap) };
    let progress = with_stream(handle, |holder| {
        let mut src = ReadCursor::new(input);
        let mut dst = WriteCursor::new(output);
        holder.stream.as_transform().transform(&mut src, &mut dst, holder.newline)
    });
    let Some(progress) = progress else {
        return -1;
    };
    if !out_read.is_null() {
        *out_read = progress.read;
    }
    if !out_written.is_null() {
        *out_written = progress.written;
    }
    0
}

/// Flush the stream's tail into dst. Returns 1 when finished, 0 if dst filled up first
/// (call again with a fresh window), or -1 on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_stream_finish(
    handle: u64,
    dst: *mut u8,
    dst_cap: size_t,
    out_written: *mut size_t,
) -> c_int {
    clear_last_error();
    if dst.is_null() && dst_cap > 0 {
        set_last_error("dst is NULL");
        return -1;
    }
    let output: &mut [u8] = if dst_cap == 0 { &mut [] } else { std::slice::from_raw_parts_mut(dst, dst_cap) };
    let result = with_stream(handle, |holder| {
        let mut dst = WriteCursor::new(output);
        let done = holder.stream.as_transform().finish(&mut dst, holder.newline);
        (done, dst.position())
    });
    let Some((done, written)) = result else {
        return -1;
    };
    if !out_written.is_null() {
        *out_written = written;
    }
    done as c_int
}

/// Release a stream handle. No-op for unknown handles.
#[no_mangle]
pub extern "C" fn tagliacarte_mime_stream_free(handle: u64) {
    if let Ok(mut open) = streams().open.lock() {
        open.remove(&handle);
    }
}

/// Parse an address list header value. Returns JSON
/// `[{"display_name": "...", "mailboxes": [{"display_name": null, "addr_spec": {...}}]}]`
/// (free with tagliacarte_mime_free_string), or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_parse_address_list(data: *const u8, len: size_t, crlf: c_int) -> *mut c_char {
    clear_last_error();
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    match parse_address_list(input, crlf != 0) {
        Ok(list) => into_json(&list),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Parse a parameter list. Returns a JSON object keyed by lower-cased parameter name, or NULL
/// on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_parse_parameter_list(data: *const u8, len: size_t, crlf: c_int) -> *mut c_char {
    clear_last_error();
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    match parse_parameter_list(input, crlf != 0) {
        Ok(map) => into_json(&map),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Parse a msg-id list (References, In-Reply-To). Returns a JSON array of
/// `{"local_part", "domain"}` objects, or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_parse_message_id_list(data: *const u8, len: size_t, crlf: c_int) -> *mut c_char {
    clear_last_error();
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    match parse_message_id_list(input, crlf != 0) {
        Ok(ids) => into_json(&ids),
        Err(e) => {
            set_last_error(e);
            ptr::null_mut()
        }
    }
}

/// Decode an unstructured header value (Subject, Comments). default_charset may be NULL for
/// utf-8. Returns the text (free with tagliacarte_mime_free_string), or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn tagliacarte_mime_decode_unstructured(
    data: *const u8,
    len: size_t,
    default_charset: *const c_char,
    force_charset: c_int,
    crlf: c_int,
) -> *mut c_char {
    clear_last_error();
    let Some(input) = byte_span(data, len) else {
        set_last_error("data is NULL");
        return ptr::null_mut();
    };
    let mut config = HeaderConfig::new().with_crlf(crlf != 0).with_force_charset(force_charset != 0);
    if let Some(charset) = ptr_to_str(default_charset) {
        config = config.with_default_charset(charset);
    }
    into_c_string(decode_unstructured(input, &config).text)
}
