/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! Wire-level framing shared by the mail, bulletin, and notify-control
//! protocols: command/response lines, dot-terminated multi-line payloads,
//! sized binary blocks, and the case-insensitive header map.

pub mod error;
pub mod framing;
pub mod headers;
pub mod readlist;

pub use error::Error;
pub use framing::{
    encode_command, normalize_to_cr, normalize_to_lf, parse_response, read_block, read_line,
    read_multiline, write_block, write_command, Response,
};
pub use headers::HeaderMap;
