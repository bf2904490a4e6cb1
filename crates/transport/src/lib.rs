/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The reliable-datagram notification transport: packet codec, a
//! retransmission queue, and the reader/writer thread pair that drive it.

pub mod error;
pub mod packet;
pub mod queue;
pub mod transport;

pub use error::NotifyError;
pub use packet::{Kind, Packet};
pub use queue::{PendingRequest, ReleaseQueue, RequestQueue};
pub use transport::{RequestHandler, Transport, MAX_AGE, RETRANS};
