/*
 * email_address.rs
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

//! RFC 5322 addresses: addr-spec, mailbox and group.

use std::fmt;

use crate::mime::codec::Codec;
use crate::mime::rfc2047::encode_word;
use crate::mime::utils::{is_dot_atom_text, is_phrase_text, quote};

/// `local-part@domain`. Both parts are empty for the null Return-Path `<>`.
/// A domain-literal keeps its brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrSpec {
    pub local_part: String,
    pub domain: String,
}

impl AddrSpec {
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// True for the null address.
    pub fn is_empty(&self) -> bool {
        self.local_part.is_empty() && self.domain.is_empty()
    }
}

impl fmt::Display for AddrSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        if is_dot_atom_text(&self.local_part) {
            write!(f, "{}@{}", self.local_part, self.domain)
        } else {
            write!(f, "{}@{}", quote(&self.local_part), self.domain)
        }
    }
}

/// A single mailbox with optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    pub display_name: Option<String>,
    pub addr_spec: AddrSpec,
}

impl Mailbox {
    pub fn new(display_name: Option<impl Into<String>>, addr_spec: AddrSpec) -> Self {
        Self {
            display_name: display_name.map(|s| s.into()),
            addr_spec,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn addr_spec(&self) -> &AddrSpec {
        &self.addr_spec
    }

    /// Address without display name: local-part@domain.
    pub fn address(&self) -> String {
        self.addr_spec.to_string()
    }

    /// Header form; non-ASCII display names become an encoded word.
    pub fn to_header_value(&self) -> String {
        match self.display_name.as_deref() {
            Some(dn) if !dn.is_empty() && !dn.is_ascii() => {
                format!("{} <{}>", encode_word(dn.as_bytes(), "utf-8", Codec::Rfc2047Q), self.addr_spec)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name.as_deref() {
            Some(dn) if is_phrase_text(dn) => write!(f, "{} <{}>", dn, self.addr_spec),
            Some(dn) if !dn.is_empty() => write!(f, "{} <{}>", quote(dn), self.addr_spec),
            _ => write!(f, "<{}>", self.addr_spec),
        }
    }
}

/// An address list entry: a group (non-empty display name) or a single mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    pub display_name: String,
    pub mailboxes: Vec<Mailbox>,
}

impl Address {
    pub fn group(display_name: impl Into<String>, mailboxes: Vec<Mailbox>) -> Self {
        Self {
            display_name: display_name.into(),
            mailboxes,
        }
    }

    pub fn is_group(&self) -> bool {
        !self.display_name.is_empty()
    }
}

impl From<Mailbox> for Address {
    fn from(mailbox: Mailbox) -> Self {
        Self {
            display_name: String::new(),
            mailboxes: vec![mailbox],
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_group() {
            if is_phrase_text(&self.display_name) {
                write!(f, "{}:", self.display_name)?;
            } else {
                write!(f, "{}:", quote(&self.display_name))?;
            }
            for (i, m) in self.mailboxes.iter().enumerate() {
                write!(f, "{}{}", if i == 0 { " " } else { ", " }, m)?;
            }
            return write!(f, ";");
        }
        match self.mailboxes.first() {
            Some(m) => write!(f, "{}", m),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_spec_display_quotes_when_needed() {
        assert_eq!(AddrSpec::new("john.doe", "example.com").to_string(), "john.doe@example.com");
        assert_eq!(AddrSpec::new("john doe", "example.com").to_string(), "\"john doe\"@example.com");
        assert_eq!(AddrSpec::default().to_string(), "");
        assert!(AddrSpec::default().is_empty());
    }

    #[test]
    fn mailbox_display() {
        let a = AddrSpec::new("alice", "example.com");
        assert_eq!(Mailbox::new(None::<String>, a.clone()).to_string(), "<alice@example.com>");
        assert_eq!(Mailbox::new(Some("Alice Liddell"), a.clone()).to_string(), "Alice Liddell <alice@example.com>");
        assert_eq!(Mailbox::new(Some("Liddell, Alice"), a).to_string(), "\"Liddell, Alice\" <alice@example.com>");
    }

    #[test]
    fn non_ascii_display_name_is_encoded() {
        let m = Mailbox::new(Some("Andr\u{e9}"), AddrSpec::new("andre", "example.org"));
        assert_eq!(m.to_header_value(), "=?utf-8?Q?Andr=C3=A9?= <andre@example.org>");
    }

    #[test]
    fn group_display() {
        let g = Address::group(
            "Team",
            vec![
                Mailbox::new(None::<String>, AddrSpec::new("a", "b.com")),
                Mailbox::new(None::<String>, AddrSpec::new("c", "d.com")),
            ],
        );
        assert!(g.is_group());
        assert_eq!(g.to_string(), "Team: <a@b.com>, <c@d.com>;");
        let single = Address::from(Mailbox::new(None::<String>, AddrSpec::new("a", "b.com")));
        assert!(!single.is_group());
    }
}
