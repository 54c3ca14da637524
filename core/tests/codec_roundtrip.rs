/*
 * codec_roundtrip.rs
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

//! Randomised round trips through every registered codec, one-shot and streamed.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagliacarte_mime::mime::{registry, Codec, Transform};
use tagliacarte_mime::{Newline, ReadCursor, WriteCursor};

const MODES: [Newline; 2] = [Newline::Lf, Newline::CrLf];

fn samples(rng: &mut StdRng) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    for len in 0..=64 {
        let mut buf = vec![0u8; len];
        rng.fill(&mut buf[..]);
        out.push(buf);
    }
    for _ in 0..16 {
        let len = rng.gen_range(65..10_000);
        let mut buf = vec![0u8; len];
        rng.fill(&mut buf[..]);
        out.push(buf);
    }
    out
}

/// Mostly printable text with line breaks, the shape QP is meant for.
fn text_sample(rng: &mut StdRng, len: usize, newline: Newline) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        match rng.gen_range(0..20) {
            0 => out.extend_from_slice(newline.as_bytes()),
            1 => out.push(b' '),
            2 => out.extend_from_slice("\u{e9}".as_bytes()),
            _ => out.push(rng.gen_range(b'!'..=b'~')),
        }
    }
    out
}

/// Push input through a stream using random window sizes on both sides.
fn drive<T: Transform>(stream: &mut T, input: &[u8], newline: Newline, rng: &mut StdRng) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let end = (pos + rng.gen_range(1..40)).min(input.len());
        let mut src = ReadCursor::with_range(input, pos, end);
        while !src.is_empty() {
            let mut window = vec![0u8; rng.gen_range(1..40)];
            let mut dst = WriteCursor::new(&mut window);
            stream.transform(&mut src, &mut dst, newline);
            out.extend_from_slice(dst.written());
        }
        pos = end;
    }
    loop {
        let mut window = vec![0u8; rng.gen_range(1..8)];
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
fn every_codec_round_trips() {
    let mut rng = StdRng::seed_from_u64(0x7a61_6c69);
    let inputs = samples(&mut rng);
    for codec in Codec::ALL {
        for newline in MODES {
            for input in &inputs {
                let encoded = codec.encode(input, newline);
                let decoded = codec.decode(&encoded, newline);
                assert_eq!(&decoded.data[..], &input[..], "{} len {}", codec.name(), input.len());
                assert_eq!(decoded.warning_count, 0, "{} len {}", codec.name(), input.len());
            }
        }
    }
}

#[test]
fn streaming_matches_one_shot() {
    let mut rng = StdRng::seed_from_u64(42);
    let inputs = samples(&mut rng);
    for codec in Codec::ALL {
        for newline in MODES {
            for input in inputs.iter().step_by(7) {
                let whole = codec.encode(input, newline);
                let mut encoder = codec.make_encoder();
                let streamed = drive(&mut encoder, input, newline, &mut rng);
                assert_eq!(&streamed[..], &whole[..], "{} encode", codec.name());

                let mut decoder = codec.make_decoder();
                let decoded = drive(&mut decoder, &streamed, newline, &mut rng);
                assert_eq!(&decoded[..], &input[..], "{} decode", codec.name());
            }
        }
    }
}

#[test]
fn base64_agrees_with_reference_encoder() {
    let mut rng = StdRng::seed_from_u64(1);
    for input in samples(&mut rng) {
        for newline in MODES {
            let encoded = Codec::Base64.encode(&input, newline);
            let text = std::str::from_utf8(&encoded).unwrap();
            let lines: Vec<&str> = text.split(std::str::from_utf8(newline.as_bytes()).unwrap()).collect();
            assert!(lines.iter().all(|l| l.len() <= 76));
            assert!(lines.iter().rev().skip(1).all(|l| l.len() == 76));
            let joined: String = lines.concat();
            assert_eq!(joined, STANDARD.encode(&input));
            let pads = joined.bytes().filter(|&b| b == b'=').count();
            assert_eq!(pads, [0, 2, 1][input.len() % 3]);
        }
    }
}

#[test]
fn base64_ignores_stray_line_breaks() {
    let mut rng = StdRng::seed_from_u64(2);
    for input in samples(&mut rng).into_iter().step_by(5) {
        let reference = STANDARD.encode(&input).into_bytes();
        let mut noisy = Vec::new();
        for &b in &reference {
            if rng.gen_range(0..10) == 0 {
                noisy.extend_from_slice(b"\r\n");
            }
            noisy.push(b);
        }
        let decoded = Codec::Base64.decode(&noisy, Newline::CrLf);
        assert_eq!(&decoded.data[..], &input[..]);
        assert_eq!(STANDARD.decode(&reference).unwrap(), input);
    }
}

#[test]
fn quoted_printable_lines_stay_short() {
    let mut rng = StdRng::seed_from_u64(3);
    for newline in MODES {
        let sep = std::str::from_utf8(newline.as_bytes()).unwrap();
        for len in [0, 1, 75, 76, 77, 500, 4000] {
            let input = text_sample(&mut rng, len, newline);
            let encoded = Codec::QuotedPrintable.encode(&input, newline);
            let text = std::str::from_utf8(&encoded).unwrap();
            for line in text.split(sep) {
                assert!(line.len() <= 76, "line of {} bytes", line.len());
                assert!(!line.ends_with(' ') && !line.ends_with('\t'));
                assert!(line.bytes().all(|b| (b' '..=b'~').contains(&b) || b == b'\t'));
            }
            assert_eq!(&Codec::QuotedPrintable.decode(&encoded, newline).data[..], &input[..]);
        }
    }
}

#[test]
fn registry_names_resolve_to_their_codec() {
    for name in registry::registered_names() {
        let codec = registry::lookup(name).unwrap();
        assert!(codec.name().eq_ignore_ascii_case(name));
        assert_eq!(registry::lookup(&name.to_ascii_uppercase()), Some(codec));
    }
    assert_eq!(registry::lookup("x-uuencode"), None);
}
