use std::io::{Read, Write};

use ahash::AHashMap;
use ndirectory::{LookupField, NameDirectory};
use session::{PushOffPolicy, Session, SessionError};
use wire::{HeaderMap, Response};

use crate::compose::{BodyFormat, OutboundComposer, RecipientDisposition, RecipientKind};
use crate::epoch::Expiration;
use crate::error::MailError;
use crate::folder::{split_csv_quoted, Folder};
use crate::identity::UserIdentity;
use crate::mailinglist::{ListPerms, MailingList};
use crate::summary::{resolve_range, MessageSummary};
use crate::warnings::{self, Warning};

/// A signed-on mail session: folder/list/summary caches plus the outbound
/// composer, all layered on the shared `session::Session` lockstep base.
pub struct MailSession<T> {
    base: Session<T>,
    identity: Option<UserIdentity>,
    folders: Option<Vec<Folder>>,
    group_lists: AHashMap<String, MailingList>,
    private_lists: AHashMap<String, MailingList>,
    composer: OutboundComposer,
}

impl<T> MailSession<T> {
    pub fn new(stream: T) -> Self {
        MailSession {
            base: Session::new(stream, tracing::info_span!("mail_session")),
            identity: None,
            folders: None,
            group_lists: AHashMap::new(),
            private_lists: AHashMap::new(),
            composer: OutboundComposer::default(),
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn connected(&self) -> bool {
        self.base.connected()
    }

    pub fn close(&mut self) {
        if self.base.connected() {
            let _ = self.base.cmd("QUIT", &[], ' ');
        }
        self.base.close();
    }
}

impl<T: Read + Write> MailSession<T> {
    /// Reads one response and splits its code into the warnings-pending
    /// flag (hundreds digit) and the two-digit value, comparing the value
    /// against `allowed`.
    fn expect_warn(&mut self, allowed: &[u32]) -> Result<(Response, bool), MailError> {
        let resp = self.base.read_response()?;
        let flag = resp.code / 100 != 0;
        let value = resp.code % 100;
        if allowed.contains(&value) {
            Ok((Response { code: value, text: resp.text }, flag))
        } else {
            Err(MailError::Session(SessionError::Protocol {
                code: resp.code,
                text: resp.text,
            }))
        }
    }

    pub fn sign_on(
        &mut self,
        directory: &dyn NameDirectory,
        name: &str,
        password: &str,
        push_off: PushOffPolicy,
    ) -> Result<bool, MailError> {
        self.base.cmd("VERS", &["1"], ' ')?;
        let (_, mut warn_pending) = self.expect_warn(&[20])?;

        let record = directory.lookup_unique(name, &[LookupField::Uid, LookupField::HomeServer])?;
        self.base.cmd("UID#", &[&record.uid.to_string()], ' ')?;
        let (challenge_resp, flag) = self.expect_warn(&[30])?;
        warn_pending |= flag;

        let response = directory.encrypt_challenge(&challenge_resp.text, password);
        self.base.cmd("PASE", &[&response], ' ')?;
        let (resp, flag) = self.expect_warn(&[10, 34])?;
        warn_pending |= flag;

        match resp.code {
            10 => {}
            34 => {
                if push_off.resolve(&resp.text) {
                    self.base.cmd("PUSH", &[], ' ')?;
                    let (_, flag) = self.expect_warn(&[10])?;
                    warn_pending |= flag;
                } else {
                    return Err(MailError::Session(SessionError::Protocol {
                        code: 334,
                        text: resp.text,
                    }));
                }
            }
            _ => unreachable!("expect_warn only returns allowed codes"),
        }

        self.identity = Some(UserIdentity::new(name, record.uid, record.home_server, password));
        Ok(warn_pending)
    }

    /// Drains pending warnings via `WARN`, terminated by the sentinel code.
    pub fn drain_warnings(&mut self) -> Result<Vec<Warning>, MailError> {
        self.base.cmd("WARN", &[], ' ')?;
        let mut out = Vec::new();
        loop {
            let (resp, _) = self.expect_warn(&[
                warnings::CODE_UNREAD_MAIL,
                warnings::CODE_MESSAGE,
                warnings::CODE_SHUTDOWN,
                warnings::CODE_NEW_MAIL,
                warnings::CODE_SENTINEL,
            ])?;
            match resp.code {
                c if c == warnings::CODE_SENTINEL => break,
                c if c == warnings::CODE_UNREAD_MAIL => out.push(Warning::UnreadMail),
                c if c == warnings::CODE_MESSAGE => out.push(Warning::Message(resp.text)),
                c if c == warnings::CODE_SHUTDOWN => out.push(Warning::Shutdown),
                c if c == warnings::CODE_NEW_MAIL => {
                    if let Some(w) = warnings::decode_new_mail(&resp.text) {
                        out.push(w);
                    }
                }
                _ => unreachable!(),
            }
        }
        Ok(out)
    }

    /// Returns the folder list, fetching via `FLIS` on first use or whenever
    /// a prior mutation marked the cache stale.
    pub fn folders(&mut self) -> Result<&[Folder], MailError> {
        let needs_fetch = match &self.folders {
            None => true,
            Some(folders) => folders.iter().any(Folder::needs_reload),
        };
        if needs_fetch {
            self.base.cmd("FLIS", &[], ' ')?;
            self.expect_warn(&[21])?;
            let lines = self.base.read_multiline()?;
            let mut parsed = Vec::with_capacity(lines.len());
            for line in &lines {
                parsed.push(Folder::parse_info_line(line)?);
            }
            self.folders = Some(parsed);
        }
        Ok(self.folders.as_deref().unwrap())
    }

    /// Marks every cached folder stale rather than discarding the cache
    /// outright, so the next `folders()` call knows to refetch.
    fn mark_folders_stale(&mut self) {
        if let Some(folders) = self.folders.as_mut() {
            for folder in folders.iter_mut() {
                folder.mark_stale();
            }
        }
    }

    pub fn create_folder(&mut self, name: &str) -> Result<(), MailError> {
        self.base.cmd("FDEF", &[name], ' ')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    pub fn remove_folder(&mut self, id: i64) -> Result<(), MailError> {
        self.base.cmd("FREM", &[&id.to_string()], ' ')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    pub fn rename_folder(&mut self, id: i64, new_name: &str) -> Result<(), MailError> {
        self.base.cmd("FNAM", &[&id.to_string(), new_name], ',')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    pub fn empty_trash(&mut self) -> Result<(), MailError> {
        self.base.cmd("TRSH", &[], ' ')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    /// Fetches message summaries for `spec` (single index, closed range, or
    /// `1-$`) in folder `folder_id`. A folder with zero messages short
    /// circuits to an empty list without issuing `FSUM`.
    pub fn summaries(&mut self, folder_id: i64, spec: &str) -> Result<Vec<MessageSummary>, MailError> {
        let count = self
            .folders()?
            .iter()
            .find(|f| f.id == folder_id)
            .map(|f| f.count())
            .unwrap_or(0);
        if count == 0 {
            return Ok(Vec::new());
        }
        let (lo, hi) = resolve_range(spec, count)?;
        self.base
            .cmd("FSUM", &[&folder_id.to_string(), &format!("{lo}-{hi}")], ',')?;
        self.expect_warn(&[22])?;
        let lines = self.base.read_multiline()?;
        lines
            .iter()
            .map(|line| MessageSummary::parse_line(line, folder_id))
            .collect()
    }

    /// Fetches `summary`'s header block, serving it from `header_cache` once
    /// a fetch has populated it rather than round-tripping on every call.
    pub fn fetch_header<'a>(&mut self, summary: &'a mut MessageSummary) -> Result<&'a HeaderMap, MailError> {
        if summary.header_cache.is_none() {
            self.base.cmd("HEAD", &[&summary.message_id.to_string()], ' ')?;
            self.expect_warn(&[23])?;
            let lines = self.base.read_multiline()?;
            summary.header_cache = Some(HeaderMap::parse(&lines));
        }
        Ok(summary.header_cache.as_ref().unwrap())
    }

    /// Fetches `[offset, offset+len)` of `summary`'s body, extending
    /// `body_cache` incrementally rather than refetching bytes it already
    /// holds. A request that falls outside the cached window's contiguous
    /// reach restarts the cache at the new window.
    pub fn fetch_body<'a>(&mut self, summary: &'a mut MessageSummary, offset: i64, len: i64) -> Result<&'a [u8], MailError> {
        let cache = &summary.body_cache;
        let have_range = !cache.data.is_empty() && offset >= cache.offset && offset + len <= cache.end();
        if !have_range {
            let cache = &summary.body_cache;
            let (fetch_offset, fetch_len) = if cache.data.is_empty() {
                (offset, len)
            } else if offset >= cache.offset && offset <= cache.end() {
                // Requested window overlaps or abuts the cache's end: fetch only the tail.
                (cache.end(), offset + len - cache.end())
            } else if offset + len >= cache.offset && offset + len <= cache.end() {
                // Requested window abuts the cache's start: fetch only the head.
                (offset, cache.offset - offset)
            } else {
                (offset, len)
            };
            self.base.cmd(
                "TEXT",
                &[
                    &summary.message_id.to_string(),
                    &fetch_offset.to_string(),
                    &fetch_len.to_string(),
                ],
                ',',
            )?;
            self.expect_warn(&[50])?;
            let data = self.base.read(fetch_len as usize)?;
            summary.body_cache.extend(fetch_offset, &data);
        }
        let cache = &summary.body_cache;
        let start = (offset - cache.offset) as usize;
        let end = start + len as usize;
        Ok(&summary.body_cache.data[start..end])
    }

    /// Re-fetches a single message's summary line, replacing `summary` in
    /// place and discarding its header/body/catalog caches.
    pub fn resync_summary(&mut self, summary: &mut MessageSummary) -> Result<(), MailError> {
        self.base.cmd(
            "MSUM",
            &[&summary.owning_folder.to_string(), &summary.message_id.to_string()],
            '/',
        )?;
        self.expect_warn(&[22])?;
        let lines = self.base.read_multiline()?;
        let line = lines
            .first()
            .ok_or_else(|| MailError::InvalidSummaryLine(String::new()))?;
        *summary = MessageSummary::parse_line(line, summary.owning_folder)?;
        Ok(())
    }

    /// Fetches the MIME part catalog for `summary`, caching it in
    /// `catalog_cache` on first use.
    pub fn fetch_catalog<'a>(&mut self, summary: &'a mut MessageSummary) -> Result<&'a [String], MailError> {
        if summary.catalog_cache.is_none() {
            self.base.cmd("MCAT", &[&summary.message_id.to_string()], ' ')?;
            self.expect_warn(&[27])?;
            let lines = self.base.read_multiline()?;
            summary.catalog_cache = Some(lines);
        }
        Ok(summary.catalog_cache.as_deref().unwrap())
    }

    /// Deletes the body range `offset..endpos`, returning the id of the
    /// replacement message the server creates for the remainder.
    pub fn delete_body_range(&mut self, message_id: i64, offset: i64, endpos: i64) -> Result<i64, MailError> {
        self.base
            .cmd("TDEL", &[&message_id.to_string(), &format!("{offset}-{endpos}")], ',')?;
        let (resp, _) = self.expect_warn(&[10])?;
        resp.text
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidInteger(resp.text.clone()))
    }

    /// Writes a one-line entry to the server's activity log. Tolerates a
    /// "logging unsupported" response rather than treating it as an error.
    pub fn log_activity(&mut self, message: &str) -> Result<(), MailError> {
        self.base.cmd("SLOG", &[message], ' ')?;
        self.expect_warn(&[10, 14])?;
        Ok(())
    }

    pub fn move_message(&mut self, message_id: i64, dest_folder: i64) -> Result<(), MailError> {
        self.base
            .cmd("MOVE", &[&message_id.to_string(), &dest_folder.to_string()], ',')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    pub fn copy_message(&mut self, message_id: i64, dest_folder: i64) -> Result<(), MailError> {
        self.base
            .cmd("COPY", &[&message_id.to_string(), &dest_folder.to_string()], ',')?;
        self.expect_warn(&[10])?;
        self.mark_folders_stale();
        Ok(())
    }

    pub fn mark(&mut self, message_id: i64, read: bool) -> Result<(), MailError> {
        let flag = if read { "1" } else { "0" };
        self.base.cmd("MARK", &[&message_id.to_string(), flag], ',')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn set_expiration(&mut self, message_id: i64, expiration: &str) -> Result<(), MailError> {
        let expr = Expiration::parse(expiration)?;
        self.base
            .cmd("EXPR", &[&message_id.to_string(), &expr.to_server_value().to_string()], ',')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    fn list_cache_mut(&mut self, group: bool) -> &mut AHashMap<String, MailingList> {
        if group {
            &mut self.group_lists
        } else {
            &mut self.private_lists
        }
    }

    pub fn create_list(&mut self, group: bool, name: &str) -> Result<(), MailError> {
        let cmd = if group { "LDEF" } else { "PDEF" };
        self.base.cmd(cmd, &[name], ' ')?;
        self.expect_warn(&[10])?;
        self.list_cache_mut(group)
            .insert(name.to_lowercase(), MailingList::new_fresh(name));
        Ok(())
    }

    pub fn set_list_members(&mut self, group: bool, name: &str, members: &[String]) -> Result<(), MailError> {
        let payload = members.join("\n").into_bytes();
        self.base
            .cmd("LDAT", &[name, &payload.len().to_string()], ',')?;
        self.expect_warn(&[50])?;
        self.base.send_block(&payload)?;
        self.expect_warn(&[10])?;
        let entry = self
            .list_cache_mut(group)
            .entry(name.to_lowercase())
            .or_insert_with(|| MailingList::new_fresh(name));
        entry.members = Some(members.to_vec());
        entry.mark_persisted();
        Ok(())
    }

    pub fn remove_list(&mut self, group: bool, name: &str) -> Result<(), MailError> {
        let cmd = if group { "LREM" } else { "PREM" };
        self.base.cmd(cmd, &[name], ' ')?;
        self.expect_warn(&[10])?;
        self.list_cache_mut(group).remove(&name.to_lowercase());
        Ok(())
    }

    /// Discovers the group (`type=2`) or private (`type=1`) mailing lists
    /// that already exist server-side, populating `perms` (group lists
    /// only) on the cached entries. This is the only path that ever learns
    /// of a list the caller didn't itself just create.
    pub fn list_names(&mut self, group: bool) -> Result<Vec<String>, MailError> {
        let list_type = if group { "2" } else { "1" };
        self.base.cmd("LSTS", &[list_type], ' ')?;
        self.expect_warn(&[25])?;
        let lines = self.base.read_multiline()?;
        let mut names = Vec::with_capacity(lines.len());
        for line in &lines {
            let (name, perms) = if group {
                let fields = split_csv_quoted(line);
                let name = fields.first().cloned().unwrap_or_default();
                let bits: i64 = fields.get(1).and_then(|p| p.parse().ok()).unwrap_or(0);
                (name, ListPerms::from_wire(bits))
            } else {
                (line.trim().to_string(), ListPerms::default())
            };
            if name.is_empty() {
                continue;
            }
            let entry = self
                .list_cache_mut(group)
                .entry(name.to_lowercase())
                .or_insert_with(|| MailingList::new_fresh(name.as_str()));
            entry.perms = perms;
            entry.mark_persisted();
            names.push(name);
        }
        Ok(names)
    }

    /// Fetches a single list's membership directly (distinct from the
    /// `members` local cache `set_list_members` writes), caching the
    /// result the same way.
    pub fn list_members(&mut self, group: bool, name: &str) -> Result<Vec<String>, MailError> {
        let list_type = if group { "2" } else { "1" };
        self.base.cmd("LIST", &[name, list_type], ',')?;
        self.expect_warn(&[26])?;
        let lines = self.base.read_multiline()?;
        let entry = self
            .list_cache_mut(group)
            .entry(name.to_lowercase())
            .or_insert_with(|| MailingList::new_fresh(name));
        entry.members = Some(lines.clone());
        entry.mark_persisted();
        Ok(lines)
    }

    pub fn get_preferences(&mut self, names: &[&str]) -> Result<HeaderMap, MailError> {
        self.base.cmd("PREF", names, ',')?;
        self.expect_warn(&[24])?;
        let lines = self.base.read_multiline()?;
        let mut map = HeaderMap::new();
        for line in &lines {
            if let Some((name, quoted)) = line.split_once(':') {
                map.insert(name.trim(), unescape_quoted(quoted.trim()));
            }
        }
        Ok(map)
    }

    pub fn set_preference(&mut self, name: &str, value: &str) -> Result<(), MailError> {
        let escaped = escape_quoted(value);
        self.base.cmd("PDEF", &[name, &escaped], ',')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn remove_preference(&mut self, name: &str) -> Result<(), MailError> {
        self.base.cmd("PREM", &[name], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn set_vacation(&mut self, text: &str) -> Result<(), MailError> {
        let payload = text.as_bytes();
        self.base.cmd("VDAT", &[&payload.len().to_string()], ' ')?;
        self.expect_warn(&[50])?;
        self.base.send_block(payload)?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn remove_vacation(&mut self) -> Result<(), MailError> {
        self.base.cmd("VREM", &[], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    /// Reads back the vacation message text, tolerating a "not set"
    /// response distinct from the sized-block-follows response `TEXT`/
    /// `VDAT` use.
    pub fn get_vacation(&mut self) -> Result<Option<String>, MailError> {
        self.base.cmd("VTXT", &[], ' ')?;
        let (resp, _) = self.expect_warn(&[50, 11])?;
        if resp.code == 11 {
            return Ok(None);
        }
        let len: usize = resp
            .text
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidInteger(resp.text.clone()))?;
        let data = self.base.read(len)?;
        Ok(Some(String::from_utf8_lossy(&data).into_owned()))
    }

    pub fn set_subject(&mut self, subject: &str) -> Result<(), MailError> {
        self.base.cmd("TOPC", &[subject], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    /// Sets the outbound message body. `MDAT <len>,<type>` announces the
    /// sized block that follows, `type` distinguishing plain text from MIME.
    pub fn set_body(&mut self, format: BodyFormat, data: &[u8]) -> Result<(), MailError> {
        let type_code = match format {
            BodyFormat::Plain => "1",
            BodyFormat::Mime => "2",
        };
        self.base.cmd("MDAT", &[&data.len().to_string(), type_code], ',')?;
        self.expect_warn(&[50])?;
        self.base.send_block(data)?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn set_plain_body(&mut self, data: &[u8]) -> Result<(), MailError> {
        self.set_body(BodyFormat::Plain, data)
    }

    pub fn set_mime_body(&mut self, data: &[u8]) -> Result<(), MailError> {
        self.set_body(BodyFormat::Mime, data)
    }

    pub fn add_recipient(&mut self, kind: RecipientKind, address: &str) -> Result<RecipientDisposition, MailError> {
        self.base.cmd(kind.command(), &[address], ' ')?;
        self.composer.ambiguous_candidates.clear();
        loop {
            let (resp, _) = self.expect_warn(&[20, 28, 40, 41, 42, 43])?;
            if let Some(disposition) = RecipientDisposition::from_terminator(resp.code) {
                return Ok(disposition);
            }
            self.composer.ambiguous_candidates.push(resp.text);
        }
    }

    pub fn set_reply_to(&mut self, address: &str) -> Result<(), MailError> {
        self.base.cmd("RPL2", &[address], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn request_receipt(&mut self, on: bool) -> Result<(), MailError> {
        self.base.cmd("RTRN", &[if on { "1" } else { "0" }], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn hide_recipients(&mut self, hide: bool) -> Result<(), MailError> {
        self.base.cmd("HIDE", &[if hide { "1" } else { "0" }], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn set_audit_folder(&mut self, folder_id: i64) -> Result<(), MailError> {
        self.base.cmd("AUDT", &[&folder_id.to_string()], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn reset_recipients(&mut self) -> Result<(), MailError> {
        self.base.cmd("CLER", &[], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn reset_all(&mut self) -> Result<(), MailError> {
        self.base.cmd("CLEA", &[], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }

    pub fn send(&mut self) -> Result<(), MailError> {
        self.base.cmd("SEND", &[], ' ')?;
        self.expect_warn(&[10])?;
        Ok(())
    }
}

fn escape_quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn unescape_quoted(value: &str) -> String {
    let trimmed = value.trim_matches('"');
    trimmed.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct TestStream(Cursor<Vec<u8>>);

    impl Read for TestStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Write for TestStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn session_with(wire: &[u8]) -> MailSession<TestStream> {
        MailSession::new(TestStream(Cursor::new(wire.to_vec())))
    }

    fn blank_summary(message_id: i64, owning_folder: i64) -> MessageSummary {
        MessageSummary {
            message_id,
            delivery_date: String::new(),
            delivery_time: String::new(),
            format: crate::summary::MessageFormat::Plain,
            sender: String::new(),
            recipient: String::new(),
            subject: String::new(),
            length: 0,
            num_enclosures: 0,
            status: String::new(),
            expires_server_ts: 0,
            owning_folder,
            header_cache: None,
            body_cache: Default::default(),
            catalog_cache: None,
        }
    }

    #[test]
    fn fetch_header_is_served_from_cache_on_second_call() {
        // Only one 23-coded response is queued; a second round trip with no
        // cache would hang waiting on input that never arrives.
        let mut session = session_with(b"23 2\nFrom: a\nTo: b\n.\n");
        let mut summary = blank_summary(1, 1);
        let first = session.fetch_header(&mut summary).unwrap().clone();
        assert_eq!(first.first("From"), Some("a"));
        let second = session.fetch_header(&mut summary).unwrap();
        assert_eq!(second.first("To"), Some("b"));
    }

    #[test]
    fn fetch_body_extends_cache_without_refetching_known_bytes() {
        let mut session = session_with(b"50 6\nhello \n");
        let mut summary = blank_summary(1, 1);
        let first = session.fetch_body(&mut summary, 0, 6).unwrap().to_vec();
        assert_eq!(first, b"hello ");
        // Fully contained in the cached window: no further input is queued,
        // so this would fail if it tried another round trip.
        let second = session.fetch_body(&mut summary, 0, 5).unwrap();
        assert_eq!(second, b"hello");
    }

    #[test]
    fn get_vacation_returns_none_on_not_set_response() {
        let mut session = session_with(b"11 not set\n");
        assert_eq!(session.get_vacation().unwrap(), None);
    }

    #[test]
    fn list_names_decodes_group_perms_and_caches_entries() {
        let mut session = session_with(b"25 1\ncs101-staff,6\n.\n");
        let names = session.list_names(true).unwrap();
        assert_eq!(names, vec!["cs101-staff".to_string()]);
        let entry = session.group_lists.get("cs101-staff").unwrap();
        assert!(entry.perms.read);
        assert!(entry.perms.write);
        assert!(!entry.perms.send);
        assert!(!entry.fresh);
    }

    #[test]
    fn escape_and_unescape_round_trip_embedded_quotes() {
        let original = r#"say "hi" please"#;
        let wire = escape_quoted(original);
        assert_eq!(wire, "\"say \"\"hi\"\" please\"");
        assert_eq!(unescape_quoted(&wire), original);
    }

    #[test]
    fn recipient_disposition_maps_terminator_codes() {
        assert_eq!(RecipientDisposition::from_terminator(28), Some(RecipientDisposition::Ok));
        assert_eq!(RecipientDisposition::from_terminator(43), Some(RecipientDisposition::Denied));
        assert_eq!(RecipientDisposition::from_terminator(99), None);
        assert_eq!(RecipientDisposition::terminator_codes(), &[28, 40, 41, 42, 43]);
    }
}
