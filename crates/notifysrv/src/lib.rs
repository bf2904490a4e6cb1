/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The notification server: the registered-client table, the reliable
//! datagram bridge (`NR02`/`CLEN`/`NOTI` dispatch and sticky-notice
//! replay), the TCP admin/control server, and the persisted-store-backed
//! configuration that ties them together.

pub mod adminserver;
pub mod client;
pub mod clienttable;
pub mod config;
pub mod error;
pub mod udpserver;

pub use adminserver::AdminServer;
pub use client::RegisteredClient;
pub use clienttable::ClientTable;
pub use config::NotifySrvConfig;
pub use error::NotifySrvError;
pub use udpserver::NotifyUdpServer;
