/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The mail-access client session: sign-on with busy/push-off arbitration,
//! folder and mailing-list caches, message-summary retrieval, the outbound
//! composer, preferences, vacation, trash, and warning multiplexing.

pub mod compose;
pub mod epoch;
pub mod error;
pub mod folder;
pub mod identity;
pub mod mailinglist;
pub mod session;
pub mod summary;
pub mod warnings;

pub use compose::{BodyFormat, OutboundComposer, RecipientDisposition, RecipientKind};
pub use epoch::{Expiration, EPOCH_OFFSET, NEVER_SENTINEL};
pub use error::MailError;
pub use folder::Folder;
pub use identity::UserIdentity;
pub use mailinglist::MailingList;
pub use session::MailSession;
pub use summary::MessageSummary;
pub use warnings::Warning;
