use std::io::{Read, Write};

use ndirectory::{LookupField, NameDirectory};
use session::Session;
use wire::HeaderMap;

use crate::article::{parse_xhead_payload, Article};
use crate::error::BulletinError;
use crate::topic::Topic;

pub struct BulletinSession<T> {
    base: Session<T>,
    topics: Option<Vec<Topic>>,
    selected: Option<String>,
}

impl<T> BulletinSession<T> {
    pub fn new(stream: T) -> Self {
        BulletinSession {
            base: Session::new(stream, tracing::info_span!("bulletin_session")),
            topics: None,
            selected: None,
        }
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

impl<T: Read + Write> BulletinSession<T> {
    pub fn sign_on(&mut self, directory: &dyn NameDirectory, name: &str, password: &str) -> Result<(), BulletinError> {
        self.base.expect(&[220])?;
        let record = directory.lookup_unique(name, &[LookupField::Uid])?;
        self.base.cmd("UID#", &[&record.uid.to_string()], ' ')?;
        let challenge = self.base.expect(&[300])?;
        let response = directory.encrypt_challenge(&challenge.text, password);
        self.base.cmd("PASE", &[&response], ' ')?;
        self.base.expect(&[210])?;
        Ok(())
    }

    pub fn topics(&mut self) -> Result<&[Topic], BulletinError> {
        if self.topics.is_none() {
            self.base.cmd("LSTB", &[], ' ')?;
            self.base.expect(&[260])?;
            let names = self.base.read_multiline()?;
            self.topics = Some(names.into_iter().map(Topic::new_unloaded).collect());
        }
        Ok(self.topics.as_deref().unwrap())
    }

    pub fn add_topic(&mut self, name: &str) -> Result<(), BulletinError> {
        self.base.cmd("ADDB", &[name], ' ')?;
        self.base.expect(&[210])?;
        self.topics = None;
        Ok(())
    }

    pub fn remove_topic(&mut self, name: &str) -> Result<(), BulletinError> {
        self.base.cmd("REMB", &[name], ' ')?;
        self.base.expect(&[210])?;
        self.topics = None;
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        Ok(())
    }

    /// Selects `name` as current, a no-op if it's already selected (the
    /// server only needs one `GROUP` per distinct topic in a row, which
    /// matters for batching `articles()` calls).
    fn ensure_selected(&mut self, name: &str) -> Result<(), BulletinError> {
        if self.selected.as_deref() == Some(name) {
            return Ok(());
        }
        self.base.cmd("GROUP", &[name], ' ')?;
        let resp = self.base.expect(&[240])?;
        if let Some(topics) = self.topics.as_mut() {
            if let Some(topic) = topics.iter_mut().find(|t| t.name == name) {
                topic.apply_info_line(&resp.text)?;
            }
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn topic_info(&mut self, name: &str) -> Result<Topic, BulletinError> {
        self.ensure_selected(name)?;
        self.topics
            .as_ref()
            .and_then(|topics| topics.iter().find(|t| t.name == name))
            .cloned()
            .ok_or(BulletinError::NoTopicSelected)
    }

    /// Fetches every article header bundle in `lo..=hi` for the currently
    /// (or newly) selected topic.
    pub fn articles(&mut self, name: &str, lo: u64, hi: u64) -> Result<Vec<Article>, BulletinError> {
        self.ensure_selected(name)?;
        self.base.cmd("XHEAD", &[&lo.to_string(), &hi.to_string()], ',')?;
        self.base.expect(&[270])?;
        let lines = self.base.read_multiline()?;
        parse_xhead_payload(&lines)
    }

    pub fn fetch_header(&mut self, article_id: u64) -> Result<HeaderMap, BulletinError> {
        self.base.cmd("HEAD", &[&article_id.to_string()], ' ')?;
        self.base.expect(&[270])?;
        let lines = self.base.read_multiline()?;
        Ok(HeaderMap::parse(&lines))
    }

    pub fn fetch_body(&mut self, article_id: u64) -> Result<String, BulletinError> {
        self.base.cmd("BODY", &[&article_id.to_string()], ' ')?;
        self.base.expect(&[280])?;
        Ok(self.base.read_multiline()?.join("\n"))
    }

    pub fn fetch_article(&mut self, article_id: u64) -> Result<String, BulletinError> {
        self.base.cmd("ARTICLE", &[&article_id.to_string()], ' ')?;
        self.base.expect(&[290])?;
        Ok(self.base.read_multiline()?.join("\n"))
    }

    pub fn mark_read(&mut self, name: &str, article_id: u64) -> Result<(), BulletinError> {
        self.ensure_selected(name)?;
        if let Some(topics) = self.topics.as_mut() {
            if let Some(topic) = topics.iter_mut().find(|t| t.name == name) {
                topic.mark_read(article_id);
                self.base
                    .cmd("UPDT", &[&topic.compacted_read_list()], ' ')?;
                self.base.expect(&[210])?;
            }
        }
        Ok(())
    }

    pub fn mark_unread(&mut self, name: &str, article_id: u64) -> Result<(), BulletinError> {
        self.ensure_selected(name)?;
        if let Some(topics) = self.topics.as_mut() {
            if let Some(topic) = topics.iter_mut().find(|t| t.name == name) {
                topic.mark_unread(article_id);
                self.base
                    .cmd("UPDT", &[&topic.compacted_read_list()], ' ')?;
                self.base.expect(&[210])?;
            }
        }
        Ok(())
    }

    /// Loads `name`'s metadata from the server without making it the
    /// selected topic, unlike `ensure_selected`'s `GROUP` fold-in. A `Topic`
    /// obtained only from `topics()` stays unloaded until either this or
    /// `ensure_selected` runs.
    pub fn load_topic(&mut self, name: &str) -> Result<Topic, BulletinError> {
        self.base.cmd("BULL", &[name], ' ')?;
        let resp = self.base.expect(&[271])?;
        if let Some(topics) = self.topics.as_mut() {
            if let Some(topic) = topics.iter_mut().find(|t| t.name == name) {
                topic.apply_info_line(&resp.text)?;
                return Ok(topic.clone());
            }
        }
        let mut topic = Topic::new_unloaded(name);
        topic.apply_info_line(&resp.text)?;
        Ok(topic)
    }

    /// Returns the topic's "About" text.
    pub fn topic_about(&mut self, name: &str) -> Result<String, BulletinError> {
        self.base.cmd("WHAT", &[name], ' ')?;
        self.base.expect(&[272])?;
        Ok(self.base.read_multiline()?.join("\n"))
    }

    /// Returns the names of topics with unread bulletins.
    pub fn new_topics(&mut self) -> Result<Vec<String>, BulletinError> {
        self.base.cmd("NEWB", &[], ' ')?;
        self.base.expect(&[273])?;
        let lines = self.base.read_multiline()?;
        Ok(lines
            .iter()
            .map(|line| line.split(',').next().unwrap_or("").to_string())
            .collect())
    }

    /// Returns the server's time-of-day stamp, as reported text.
    pub fn server_time(&mut self) -> Result<String, BulletinError> {
        self.base.cmd("TOD", &[], ' ')?;
        let resp = self.base.expect(&[274])?;
        Ok(resp.text)
    }

    /// Sends a keepalive and polls for pending warnings (new bulletins).
    pub fn keep_alive(&mut self) -> Result<(), BulletinError> {
        self.base.cmd("NOOP", &[], ' ')?;
        self.base.expect(&[200])?;
        Ok(())
    }
}
