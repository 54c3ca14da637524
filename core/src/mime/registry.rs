/*
 * registry.rs
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

//! Process-wide codec lookup by name (case-insensitive). Built on first use.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::mime::codec::Codec;

fn registry() -> &'static HashMap<String, Codec> {
    static REGISTRY: OnceLock<HashMap<String, Codec>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        log::trace!("initializing codec registry");
        Codec::ALL
            .iter()
            .map(|&codec| (codec.name().to_ascii_lowercase(), codec))
            .collect()
    })
}

/// Find a codec by name, ignoring ASCII case. Unknown names give `None`.
pub fn lookup(name: &str) -> Option<Codec> {
    registry().get(name.trim().to_ascii_lowercase().as_str()).copied()
}

/// Canonical names of all registered codecs.
pub fn registered_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = registry().values().map(|c| c.name()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("BASE64"), Some(Codec::Base64));
        assert_eq!(lookup("Quoted-Printable"), Some(Codec::QuotedPrintable));
        assert_eq!(lookup("b"), Some(Codec::Rfc2047B));
        assert_eq!(lookup("q"), Some(Codec::Rfc2047Q));
        assert_eq!(lookup("X-KMIME-RFC2231"), Some(Codec::Rfc2231));
    }

    #[test]
    fn unknown_names_are_none() {
        assert_eq!(lookup("uuencode"), None);
        assert_eq!(lookup(""), None);
        assert_eq!(lookup("7bit"), None);
    }

    #[test]
    fn all_builtins_registered() {
        assert_eq!(
            registered_names(),
            vec!["B", "Q", "base64", "quoted-printable", "x-kmime-rfc2231"]
        );
    }

    #[test]
    fn concurrent_first_use() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| lookup("base64")))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(Codec::Base64));
        }
    }
}
