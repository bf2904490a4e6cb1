/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! The bulletin-board client session: sign-on, topic cache, read-list
//! compaction, and per-topic article fetch.

pub mod article;
pub mod error;
pub mod session;
pub mod topic;

pub use article::Article;
pub use error::BulletinError;
pub use session::BulletinSession;
pub use topic::Topic;
