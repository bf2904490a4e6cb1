use wire::HeaderMap;

use crate::error::MailError;
use crate::folder::split_csv_quoted;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Plain,
    Mime,
}

impl MessageFormat {
    fn from_wire(value: i64) -> MessageFormat {
        match value {
            2 => MessageFormat::Mime,
            _ => MessageFormat::Plain,
        }
    }
}

/// A cached window of the message body: `[offset, offset + data.len())`.
/// Reads that extend the window append or prepend rather than refetching
/// the whole body.
#[derive(Debug, Clone, Default)]
pub struct BodyCache {
    pub offset: i64,
    pub data: Vec<u8>,
}

impl BodyCache {
    pub fn end(&self) -> i64 {
        self.offset + self.data.len() as i64
    }

    /// Merges a freshly fetched `[offset, offset+len)` slice into the
    /// cache, extending on either side; invalidated (cleared) ranges are
    /// represented by an empty cache, which this always accepts cleanly.
    pub fn extend(&mut self, offset: i64, fetched: &[u8]) {
        if self.data.is_empty() {
            self.offset = offset;
            self.data = fetched.to_vec();
            return;
        }
        if offset == self.end() {
            self.data.extend_from_slice(fetched);
        } else if offset + (fetched.len() as i64) == self.offset {
            let mut merged = fetched.to_vec();
            merged.extend_from_slice(&self.data);
            self.offset = offset;
            self.data = merged;
        } else {
            // Non-contiguous fetch: the cache restarts at the new window.
            self.offset = offset;
            self.data = fetched.to_vec();
        }
    }

    pub fn invalidate(&mut self) {
        self.offset = 0;
        self.data.clear();
    }
}

#[derive(Debug, Clone)]
pub struct MessageSummary {
    pub message_id: i64,
    pub delivery_date: String,
    pub delivery_time: String,
    pub format: MessageFormat,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub length: i64,
    pub num_enclosures: i64,
    pub status: String,
    pub expires_server_ts: i64,
    pub owning_folder: i64,
    pub header_cache: Option<HeaderMap>,
    pub body_cache: BodyCache,
    pub catalog_cache: Option<Vec<String>>,
}

impl MessageSummary {
    /// Parses a summary line as in scenario 3:
    /// `id,date,time,format,"sender","recipient","subject",len,enc,status,expires`
    pub fn parse_line(line: &str, owning_folder: i64) -> Result<MessageSummary, MailError> {
        let f = split_csv_quoted(line);
        if f.len() != 11 {
            return Err(MailError::InvalidSummaryLine(line.to_string()));
        }
        let bad = || MailError::InvalidSummaryLine(line.to_string());
        Ok(MessageSummary {
            message_id: f[0].parse().map_err(|_| bad())?,
            delivery_date: f[1].clone(),
            delivery_time: f[2].clone(),
            format: MessageFormat::from_wire(f[3].parse().map_err(|_| bad())?),
            sender: f[4].clone(),
            recipient: f[5].clone(),
            subject: f[6].clone(),
            length: f[7].parse().map_err(|_| bad())?,
            num_enclosures: f[8].parse().map_err(|_| bad())?,
            status: f[9].clone(),
            expires_server_ts: f[10].parse().map_err(|_| bad())?,
            owning_folder,
            header_cache: None,
            body_cache: BodyCache::default(),
            catalog_cache: None,
        })
    }

    pub fn expires_unix(&self) -> i64 {
        crate::epoch::server_to_unix(self.expires_server_ts)
    }

    pub fn invalidate_caches(&mut self) {
        self.header_cache = None;
        self.body_cache.invalidate();
        self.catalog_cache = None;
    }
}

/// Resolves a 1-based index, supporting Python-style negative wrap
/// (`-1` = last message), against a folder's message count.
pub fn resolve_index(idx: i64, count: i64) -> Result<i64, MailError> {
    let resolved = if idx < 0 { count + idx + 1 } else { idx };
    if resolved < 1 || resolved > count {
        Err(MailError::IndexOutOfRange(idx, count))
    } else {
        Ok(resolved)
    }
}

/// Resolves a range spec: a single index, or `lo-hi` where `hi` may be `$`
/// meaning "last message in the folder."
pub fn resolve_range(spec: &str, count: i64) -> Result<(i64, i64), MailError> {
    if let Some((lo, hi)) = spec.split_once('-') {
        let lo: i64 = lo
            .parse()
            .map_err(|_| MailError::InvalidSummaryLine(spec.to_string()))?;
        let hi = if hi == "$" {
            count
        } else {
            hi.parse()
                .map_err(|_| MailError::InvalidSummaryLine(spec.to_string()))?
        };
        Ok((resolve_index(lo, count)?, resolve_index(hi, count)?))
    } else {
        let idx: i64 = spec
            .parse()
            .map_err(|_| MailError::InvalidSummaryLine(spec.to_string()))?;
        let resolved = resolve_index(idx, count)?;
        Ok((resolved, resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_3: &str =
        r#"42,03/14/25,09:27:05,2,"Alice","Bob","Hello",1024,0,N,4009644800"#;

    #[test]
    fn parses_summary_line_per_scenario_3() {
        let s = MessageSummary::parse_line(SCENARIO_3, 1).unwrap();
        assert_eq!(s.message_id, 42);
        assert_eq!(s.format, MessageFormat::Mime);
        assert_eq!(s.sender, "Alice");
        assert_eq!(s.subject, "Hello");
        assert_eq!(s.length, 1024);
        assert_eq!(s.expires_unix(), 1_926_818_000);
    }

    #[test]
    fn resolves_positive_and_negative_indices() {
        assert_eq!(resolve_index(1, 10).unwrap(), 1);
        assert_eq!(resolve_index(-1, 10).unwrap(), 10);
        assert_eq!(resolve_index(-2, 10).unwrap(), 9);
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert!(resolve_index(11, 10).is_err());
        assert!(resolve_index(0, 10).is_err());
    }

    #[test]
    fn resolves_dollar_range_to_last_message() {
        assert_eq!(resolve_range("1-$", 7).unwrap(), (1, 7));
    }

    #[test]
    fn resolves_closed_range() {
        assert_eq!(resolve_range("2-5", 7).unwrap(), (2, 5));
    }

    #[test]
    fn body_cache_extends_contiguously() {
        let mut cache = BodyCache::default();
        cache.extend(0, b"hello ");
        cache.extend(6, b"world");
        assert_eq!(cache.data, b"hello world");
        assert_eq!(cache.offset, 0);
    }

    #[test]
    fn body_cache_prepends_contiguously() {
        let mut cache = BodyCache::default();
        cache.extend(6, b"world");
        cache.extend(0, b"hello ");
        assert_eq!(cache.data, b"hello world");
        assert_eq!(cache.offset, 0);
    }
}
