/*
 * obsolete.rs
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

//! Obsolete but recoverable RFC 5322 structures (section 4.5).
//! The parsers accept these and report each one at debug level.

use std::fmt;

/// Types of obsolete structure detected during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObsoleteStructureType {
    /// CFWS around the dots of a local part.
    ObsoleteLocalPart,
    /// CFWS around the dots of a domain, or a trailing dot.
    ObsoleteDomain,
    /// Source route inside an angle-addr (`<@a,@b:user@host>`).
    ObsoleteRoute,
    /// Empty entry or missing comma in an address or mailbox list.
    ObsoleteList,
    /// Display name carried in a trailing comment (`user@host (Name)`).
    ObsoleteCommentName,
    /// Commas between the msg-ids of a list.
    ObsoleteMessageIdSyntax,
}

impl ObsoleteStructureType {
    /// Log that this structure was accepted at `offset`.
    pub(crate) fn report(self, offset: usize) {
        log::debug!("obsolete syntax accepted: {} at offset {}", self, offset);
    }
}

impl fmt::Display for ObsoleteStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObsoleteStructureType::ObsoleteLocalPart => "obs-local-part",
            ObsoleteStructureType::ObsoleteDomain => "obs-domain",
            ObsoleteStructureType::ObsoleteRoute => "obs-route",
            ObsoleteStructureType::ObsoleteList => "obs-list",
            ObsoleteStructureType::ObsoleteCommentName => "comment display name",
            ObsoleteStructureType::ObsoleteMessageIdSyntax => "comma in msg-id list",
        })
    }
}
