/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The session base shared by every line-oriented protocol dialect in this
//! workspace (mail, bulletin, notify-control) and their server-side
//! counterparts: command framing, response expectation, sized-block and
//! multi-line reads, and lost-connection bookkeeping.

pub mod base;
pub mod error;
pub mod pushoff;

pub use base::Session;
pub use error::SessionError;
pub use pushoff::PushOffPolicy;
