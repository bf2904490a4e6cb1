/*
 * SPDX-FileCopyrightText: 2026 Campus Mail Systems Group
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! Contract for the external name-directory collaborator: resolving a user
//! name to its identity record and encrypting a sign-on challenge. The real
//! directory service is out of scope; this crate defines the trait the rest
//! of the workspace consumes and an in-memory test double.

use ahash::AHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("no unique match for {0:?}")]
    NoUniqueMatch(String),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Fields the core is permitted to request from a directory lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupField {
    Uid,
    HomeServer,
    FullName,
}

#[derive(Debug, Clone, Default)]
pub struct UserRecord {
    pub name: String,
    pub uid: i64,
    pub home_server: String,
    pub full_name: String,
}

pub trait NameDirectory: Send + Sync {
    /// Resolves `name` to a unique record; fails if zero or more than one
    /// match exists for the requested fields.
    fn lookup_unique(
        &self,
        name: &str,
        fields: &[LookupField],
    ) -> Result<UserRecord, DirectoryError>;

    /// Encrypts `password` against `challenge`, yielding the 24 octal-digit
    /// response string the sign-on protocol expects.
    fn encrypt_challenge(&self, challenge: &str, password: &str) -> String;
}

/// In-memory double used by the rest of the workspace's tests: a static
/// table of users plus a fixed, reversible (not cryptographic) challenge
/// scheme so tests can verify round-trips without a real directory server.
#[derive(Debug, Default)]
pub struct TestDirectory {
    users: AHashMap<String, UserRecord>,
}

impl TestDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, record: UserRecord) -> Self {
        self.users.insert(record.name.to_lowercase(), record);
        self
    }
}

impl NameDirectory for TestDirectory {
    fn lookup_unique(
        &self,
        name: &str,
        _fields: &[LookupField],
    ) -> Result<UserRecord, DirectoryError> {
        self.users
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| DirectoryError::NoUniqueMatch(name.to_string()))
    }

    fn encrypt_challenge(&self, challenge: &str, password: &str) -> String {
        // XOR each byte of password against the challenge bytes (repeating),
        // rendered as octal digits, then padded/truncated to 24 digits.
        let mut out = String::with_capacity(24);
        let cbytes = challenge.as_bytes();
        let pbytes = password.as_bytes();
        let mut i = 0;
        while out.len() < 24 {
            let c = cbytes.get(i % cbytes.len().max(1)).copied().unwrap_or(0);
            let p = pbytes.get(i % pbytes.len().max(1)).copied().unwrap_or(0);
            out.push_str(&format!("{:02o}", (c ^ p) & 0o77));
            i += 1;
        }
        out.truncate(24);
        out
    }
}
