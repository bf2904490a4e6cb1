/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The notify-control TCP client: authentication and
//! `NOTIFY`/`CLEAR`/`CLIENT`/`LIST` issuance with Pascal-encoded payloads.

pub mod error;
pub mod pascal;
pub mod session;

pub use error::NotifyCtlError;
pub use session::{ListKind, NotifyCtlSession};
