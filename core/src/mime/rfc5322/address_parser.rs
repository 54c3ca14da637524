/*
 * address_parser.rs
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

//! RFC 5322 address parsing (From, To, Cc, Sender, Return-Path, ...).
//!
//! Each grammar rule has a tokenizer-level form, which leaves the cursor at the failure
//! point, and a byte-level `parse_*` form over a whole header value. Obsolete syntax from
//! RFC 5322 section 4.4 is accepted.

use super::email_address::{AddrSpec, Address, Mailbox};
use super::obsolete::ObsoleteStructureType;
use crate::error::{ParseError, ParseErrorKind};
use crate::mime::rfc2047::bytes_to_string;
use crate::mime::tokenizer::{parse_all, Tokenizer};
use crate::mime::utils::is_atext;

fn local_part(t: &mut Tokenizer<'_>) -> Result<String, ParseError> {
    let mut out = String::new();
    loop {
        match t.parse_word()? {
            Some(word) => out.push_str(&word),
            None => return Err(t.error(ParseErrorKind::ExpectedWord)),
        }
        let save = t.position();
        let before = t.skip_cfws()?;
        if !t.eat(b'.') {
            t.reset(save);
            return Ok(out);
        }
        let after = t.skip_cfws()?;
        if before || after {
            ObsoleteStructureType::ObsoleteLocalPart.report(save);
        }
        out.push('.');
        if t.peek() == Some(b'@') {
            ObsoleteStructureType::ObsoleteLocalPart.report(t.position());
            return Ok(out);
        }
    }
}

fn domain(t: &mut Tokenizer<'_>) -> Result<String, ParseError> {
    t.skip_cfws()?;
    if t.peek() == Some(b'[') {
        return Ok(format!("[{}]", t.parse_domain_literal()?));
    }
    let mut out = String::new();
    loop {
        match t.parse_atom() {
            Some(atom) => out.push_str(&bytes_to_string(atom)),
            None => return Err(t.error(ParseErrorKind::ExpectedDomain)),
        }
        let save = t.position();
        let before = t.skip_cfws()?;
        if !t.eat(b'.') {
            t.reset(save);
            return Ok(out);
        }
        let after = t.skip_cfws()?;
        if before || after {
            ObsoleteStructureType::ObsoleteDomain.report(save);
        }
        out.push('.');
        if !t.peek().is_some_and(is_atext) {
            ObsoleteStructureType::ObsoleteDomain.report(t.position());
            return Ok(out);
        }
    }
}

/// addr-spec = local-part "@" domain
pub fn addr_spec(t: &mut Tokenizer<'_>) -> Result<AddrSpec, ParseError> {
    t.skip_cfws()?;
    let local_part = local_part(t)?;
    t.skip_cfws()?;
    if !t.eat(b'@') {
        return Err(t.error(ParseErrorKind::ExpectedAt));
    }
    let domain = domain(t)?;
    Ok(AddrSpec { local_part, domain })
}

fn obs_route(t: &mut Tokenizer<'_>) -> Result<(), ParseError> {
    let offset = t.position();
    loop {
        t.skip_cfws()?;
        if t.eat(b',') {
            continue;
        }
        if t.eat(b'@') {
            domain(t)?;
            continue;
        }
        break;
    }
    if !t.eat(b':') {
        return Err(t.error(ParseErrorKind::UnexpectedByte));
    }
    ObsoleteStructureType::ObsoleteRoute.report(offset);
    Ok(())
}

/// angle-addr = "<" [obs-route] addr-spec ">"; `<>` only when `allow_empty`.
fn angle_addr(t: &mut Tokenizer<'_>, allow_empty: bool) -> Result<AddrSpec, ParseError> {
    if !t.eat(b'<') {
        return Err(t.error(ParseErrorKind::UnexpectedByte));
    }
    t.skip_cfws()?;
    if t.peek() == Some(b'>') {
        if !allow_empty {
            return Err(t.error(ParseErrorKind::ExpectedWord));
        }
        t.bump();
        return Ok(AddrSpec::default());
    }
    if matches!(t.peek(), Some(b'@') | Some(b',')) {
        obs_route(t)?;
    }
    let spec = addr_spec(t)?;
    t.skip_cfws()?;
    if !t.eat(b'>') {
        return Err(t.error(ParseErrorKind::ExpectedAngleClose));
    }
    Ok(spec)
}

/// `user@host (Full Name)`: the first non-empty trailing comment names the mailbox.
fn trailing_comment_name(t: &mut Tokenizer<'_>) -> Result<Option<String>, ParseError> {
    let mut name = None;
    loop {
        t.skip_whitespace();
        if t.peek() != Some(b'(') {
            return Ok(name);
        }
        let offset = t.position();
        let comment = t.parse_comment()?;
        let comment = comment.trim();
        if name.is_none() && !comment.is_empty() {
            ObsoleteStructureType::ObsoleteCommentName.report(offset);
            name = Some(comment.to_string());
        }
    }
}

/// mailbox = name-addr / addr-spec
pub fn mailbox(t: &mut Tokenizer<'_>) -> Result<Mailbox, ParseError> {
    t.skip_cfws()?;
    let start = t.position();
    let mut bare_error = None;
    if t.peek() != Some(b'<') {
        match addr_spec(t) {
            Ok(addr_spec) => {
                let display_name = trailing_comment_name(t)?;
                if t.peek() != Some(b'<') {
                    return Ok(Mailbox { display_name, addr_spec });
                }
            }
            Err(e) => bare_error = Some(e),
        }
        t.reset(start);
    }
    let display_name = t.parse_phrase()?;
    t.skip_cfws()?;
    if t.peek() != Some(b'<') {
        return Err(bare_error.unwrap_or_else(|| t.error(ParseErrorKind::UnexpectedByte)));
    }
    let addr_spec = angle_addr(t, false)?;
    t.skip_cfws()?;
    Ok(Mailbox { display_name, addr_spec })
}

/// group = display-name ":" [group-list] ";" [CFWS]
pub fn group(t: &mut Tokenizer<'_>) -> Result<Address, ParseError> {
    t.skip_cfws()?;
    let display_name = match t.parse_phrase()? {
        Some(name) if !name.is_empty() => name,
        _ => return Err(t.error(ParseErrorKind::ExpectedWord)),
    };
    t.skip_cfws()?;
    if !t.eat(b':') {
        return Err(t.error(ParseErrorKind::UnexpectedByte));
    }
    let mailboxes = list(t, Some(b';'), mailbox)?;
    if !t.eat(b';') {
        return Err(t.error(ParseErrorKind::ExpectedGroupEnd));
    }
    t.skip_cfws()?;
    Ok(Address::group(display_name, mailboxes))
}

/// address = mailbox / group
pub fn address(t: &mut Tokenizer<'_>) -> Result<Address, ParseError> {
    t.skip_cfws()?;
    let start = t.position();
    if t.parse_phrase()?.is_some() {
        t.skip_cfws()?;
        if t.peek() == Some(b':') {
            t.reset(start);
            return group(t);
        }
    }
    t.reset(start);
    mailbox(t).map(Address::from)
}

/// Comma-separated list ending at `end` (not consumed) or end of input.
/// Empty entries and missing commas are tolerated.
fn list<'a, T>(
    t: &mut Tokenizer<'a>,
    end: Option<u8>,
    mut item: impl FnMut(&mut Tokenizer<'a>) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let mut out = Vec::new();
    loop {
        t.skip_cfws()?;
        match t.peek() {
            None => break,
            Some(b) if Some(b) == end => break,
            Some(b',') => {
                ObsoleteStructureType::ObsoleteList.report(t.position());
                t.bump();
                continue;
            }
            Some(_) => {}
        }
        out.push(item(t)?);
        t.skip_cfws()?;
        match t.peek() {
            None => break,
            Some(b) if Some(b) == end => break,
            Some(b',') => t.bump(),
            Some(_) => ObsoleteStructureType::ObsoleteList.report(t.position()),
        }
    }
    Ok(out)
}

pub fn address_list(t: &mut Tokenizer<'_>) -> Result<Vec<Address>, ParseError> {
    list(t, None, address)
}

/// Like [`address_list`] but groups are not allowed.
pub fn mailbox_list(t: &mut Tokenizer<'_>) -> Result<Vec<Mailbox>, ParseError> {
    list(t, None, mailbox)
}

/// Return-Path: a mailbox or `<>` (empty addr-spec). A display name or trailing garbage is
/// logged and ignored.
pub fn return_path(t: &mut Tokenizer<'_>) -> Result<Option<AddrSpec>, ParseError> {
    t.skip_cfws()?;
    if t.is_at_end() {
        return Ok(None);
    }
    let start = t.position();
    let mut null_path = false;
    if t.eat(b'<') {
        t.skip_cfws()?;
        null_path = t.eat(b'>');
        if !null_path {
            t.reset(start);
        }
    }
    let spec = if null_path {
        AddrSpec::default()
    } else {
        let mailbox = mailbox(t)?;
        if let Some(name) = mailbox.display_name.as_deref() {
            log::warn!("Return-Path has a display name: {:?}", name);
        }
        mailbox.addr_spec
    };
    t.skip_cfws()?;
    if !t.is_at_end() {
        log::warn!("ignoring trailing garbage in Return-Path at offset {}", t.position());
    }
    Ok(Some(spec))
}

pub fn parse_addr_spec(input: &[u8], crlf: bool) -> Result<Option<AddrSpec>, ParseError> {
    parse_all(input, crlf, addr_spec)
}

pub fn parse_mailbox(input: &[u8], crlf: bool) -> Result<Option<Mailbox>, ParseError> {
    parse_all(input, crlf, mailbox)
}

pub fn parse_address(input: &[u8], crlf: bool) -> Result<Option<Address>, ParseError> {
    parse_all(input, crlf, address)
}

/// Parse an address list header value (To, Cc, Bcc, Reply-To, ...).
pub fn parse_address_list(input: &[u8], crlf: bool) -> Result<Vec<Address>, ParseError> {
    Ok(parse_all(input, crlf, address_list)?.unwrap_or_default())
}

/// Parse a mailbox list header value (From, Resent-From).
pub fn parse_mailbox_list(input: &[u8], crlf: bool) -> Result<Vec<Mailbox>, ParseError> {
    Ok(parse_all(input, crlf, mailbox_list)?.unwrap_or_default())
}

pub fn parse_return_path(input: &[u8], crlf: bool) -> Result<Option<AddrSpec>, ParseError> {
    return_path(&mut Tokenizer::new(input, crlf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(name: Option<&str>, local: &str, domain: &str) -> Mailbox {
        Mailbox::new(name, AddrSpec::new(local, domain))
    }

    #[test]
    fn single_bare_address() {
        let list = parse_address_list(b"a@b.com", false).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].display_name, "");
        assert!(!list[0].is_group());
        assert_eq!(list[0].mailboxes, vec![mb(None, "a", "b.com")]);
    }

    #[test]
    fn group_with_two_members() {
        let list = parse_address_list(b"Group: a@b.com, c@d.com;", false).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].is_group());
        assert_eq!(list[0].display_name, "Group");
        assert_eq!(list[0].mailboxes, vec![mb(None, "a", "b.com"), mb(None, "c", "d.com")]);
    }

    #[test]
    fn empty_group() {
        let list = parse_address_list(b"Undisclosed recipients:;", false).unwrap();
        assert_eq!(list, vec![Address::group("Undisclosed recipients", vec![])]);
    }

    #[test]
    fn group_requires_semicolon() {
        let err = parse_address_list(b"G: a@b.com", false).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedGroupEnd);
        assert_eq!(err.offset, 10);
    }

    #[test]
    fn mixed_list() {
        let input = b"\"Joe Q. Public\" <john.q.public@example.com>, Mary Smith <mary@x.test>, jdoe@example.org, Who? <one@y.test>";
        let list = parse_address_list(input, false).unwrap();
        let mailboxes: Vec<Mailbox> = list.into_iter().flat_map(|a| a.mailboxes).collect();
        assert_eq!(
            mailboxes,
            vec![
                mb(Some("Joe Q. Public"), "john.q.public", "example.com"),
                mb(Some("Mary Smith"), "mary", "x.test"),
                mb(None, "jdoe", "example.org"),
                mb(Some("Who?"), "one", "y.test"),
            ]
        );
    }

    #[test]
    fn quoted_display_name_with_specials() {
        let input = b"<boss@nil.test>, \"Giant; \\\"Big\\\" Box\" <sysservices@example.net>";
        let list = parse_mailbox_list(input, false).unwrap();
        assert_eq!(list[0], mb(None, "boss", "nil.test"));
        assert_eq!(list[1], mb(Some("Giant; \"Big\" Box"), "sysservices", "example.net"));
    }

    #[test]
    fn replacement_character_in_display_name() {
        let m = parse_mailbox("\"x\u{FFFD}y\" <a@b>".as_bytes(), false).unwrap().unwrap();
        assert_eq!(m.display_name(), Some("x\u{FFFD}y"));
    }

    #[test]
    fn comments_everywhere() {
        let input = b"Pete(A nice \\) chap) <pete(his account)@silly.test(his host)>";
        let m = parse_mailbox(input, false).unwrap().unwrap();
        assert_eq!(m, mb(Some("Pete"), "pete", "silly.test"));
    }

    #[test]
    fn obsolete_forms() {
        let m = parse_mailbox(b"Joe Q. Public <john.q.public@example.com>", false).unwrap().unwrap();
        assert_eq!(m.display_name(), Some("Joe Q. Public"));

        let m = parse_mailbox(b"<@node.test,@node2.test:john.doe@example.com>", false).unwrap().unwrap();
        assert_eq!(m, mb(None, "john.doe", "example.com"));

        let spec = parse_addr_spec(b"john . doe @ example . com", false).unwrap().unwrap();
        assert_eq!(spec, AddrSpec::new("john.doe", "example.com"));
    }

    #[test]
    fn trailing_comment_names_the_mailbox() {
        let m = parse_mailbox(b"alice@example.com (Alice Liddell)", false).unwrap().unwrap();
        assert_eq!(m, mb(Some("Alice Liddell"), "alice", "example.com"));
    }

    #[test]
    fn quoted_local_part_and_domain_literal() {
        let spec = parse_addr_spec(b"\"john doe\"@[10.0.0.1]", false).unwrap().unwrap();
        assert_eq!(spec.local_part(), "john doe");
        assert_eq!(spec.domain(), "[10.0.0.1]");
    }

    #[test]
    fn lenient_lists() {
        let list = parse_address_list(b", a@b.com,, c@d.com ,", false).unwrap();
        assert_eq!(list.len(), 2);
        let list = parse_mailbox_list(b"<a@b.com> <c@d.com>", false).unwrap();
        assert_eq!(list, vec![mb(None, "a", "b.com"), mb(None, "c", "d.com")]);
    }

    #[test]
    fn folded_list_in_crlf_mode() {
        let list = parse_address_list(b"a@b.com,\r\n c@d.com", true).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn mailbox_list_rejects_groups() {
        assert!(parse_mailbox_list(b"G: a@b.com;", false).is_err());
    }

    #[test]
    fn errors_carry_offsets() {
        let err = parse_address_list(b"foo", false).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::ExpectedAt, 3));
        let err = parse_mailbox(b"Name <a@b.com", false).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::ExpectedAngleClose, 13));
    }

    #[test]
    fn empty_input_is_empty_result() {
        assert_eq!(parse_address_list(b"", false).unwrap(), vec![]);
        assert_eq!(parse_address_list(b"  (nobody) ", false).unwrap(), vec![]);
        assert_eq!(parse_mailbox_list(b"", true).unwrap(), vec![]);
        assert_eq!(parse_mailbox(b"", false).unwrap(), None);
        assert_eq!(parse_return_path(b"", false).unwrap(), None);
    }

    #[test]
    fn return_path_forms() {
        assert_eq!(parse_return_path(b"<>", false).unwrap(), Some(AddrSpec::default()));
        assert_eq!(parse_return_path(b" < > ", false).unwrap(), Some(AddrSpec::default()));
        assert_eq!(
            parse_return_path(b"<bounce@lists.example.org>", false).unwrap(),
            Some(AddrSpec::new("bounce", "lists.example.org"))
        );
        assert_eq!(
            parse_return_path(b"Bounces <b@x.test> junk", false).unwrap(),
            Some(AddrSpec::new("b", "x.test"))
        );
    }
}
