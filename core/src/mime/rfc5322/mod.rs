/*
 * mod.rs
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

//! RFC 5322 structured header fields: addresses, msg-ids and keyword phrases.

mod address_parser;
mod email_address;
mod message_id_list;
mod obsolete;
mod phrase_list;

pub use address_parser::{
    addr_spec, address, address_list, group, mailbox, mailbox_list, parse_addr_spec, parse_address,
    parse_address_list, parse_mailbox, parse_mailbox_list, parse_return_path, return_path,
};
pub use email_address::{AddrSpec, Address, Mailbox};
pub use message_id_list::{msg_id, msg_id_list, parse_message_id_list, parse_msg_id};
pub use obsolete::ObsoleteStructureType;
pub use phrase_list::{parse_phrase_list, phrase_list};
