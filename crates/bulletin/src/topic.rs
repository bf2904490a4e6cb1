use std::collections::BTreeSet;

use crate::error::BulletinError;

fn split_csv_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    title: String,
    watch: bool,
    post: bool,
    id_low: u64,
    id_high: u64,
    last_id: u64,
    read_set: BTreeSet<u64>,
    loaded: bool,
}

impl Topic {
    pub fn new_unloaded(name: impl Into<String>) -> Self {
        Topic {
            name: name.into(),
            title: String::new(),
            watch: false,
            post: false,
            id_low: 0,
            id_high: 0,
            last_id: 0,
            read_set: BTreeSet::new(),
            loaded: false,
        }
    }

    /// Parses a `GROUP` info line: `id_low,id_high,last_id,"title",watch,post`.
    pub fn apply_info_line(&mut self, line: &str) -> Result<(), BulletinError> {
        let f = split_csv_quoted(line);
        if f.len() != 6 {
            return Err(BulletinError::InvalidTopicLine(line.to_string()));
        }
        let bad = || BulletinError::InvalidTopicLine(line.to_string());
        self.id_low = f[0].parse().map_err(|_| bad())?;
        self.id_high = f[1].parse().map_err(|_| bad())?;
        self.last_id = f[2].parse().map_err(|_| bad())?;
        self.title = f[3].clone();
        self.watch = f[4] != "0";
        self.post = f[5] != "0";
        self.loaded = true;
        Ok(())
    }

    pub fn needs_load(&self) -> bool {
        !self.loaded
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn watch(&self) -> bool {
        self.watch
    }

    pub fn post(&self) -> bool {
        self.post
    }

    pub fn id_range(&self) -> (u64, u64) {
        (self.id_low, self.id_high)
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn mark_read(&mut self, id: u64) {
        self.read_set.insert(id);
    }

    pub fn mark_unread(&mut self, id: u64) {
        self.read_set.remove(&id);
    }

    pub fn is_read(&self, id: u64) -> bool {
        self.read_set.contains(&id)
    }

    /// Compacted read-list, with ids below `id_low` dropped (the floor the
    /// server retires articles past).
    pub fn compacted_read_list(&self) -> String {
        let clamped = wire::readlist::clamp_floor(&self.read_set, self.id_low);
        wire::readlist::compact(&clamped)
    }

    pub fn load_read_list(&mut self, wire_form: &str) {
        self.read_set = wire::readlist::parse(wire_form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_group_info_line() {
        let mut t = Topic::new_unloaded("cs101-announce");
        t.apply_info_line(r#"1,120,120,"CS101 Announcements",1,0"#).unwrap();
        assert_eq!(t.id_range(), (1, 120));
        assert_eq!(t.title(), "CS101 Announcements");
        assert!(t.watch());
        assert!(!t.post());
        assert!(!t.needs_load());
    }

    #[test]
    fn read_list_round_trips_per_scenario_5() {
        let mut t = Topic::new_unloaded("x");
        t.apply_info_line(r#"1,9,9,"X",0,0"#).unwrap();
        for id in [1, 2, 3, 5, 7, 8, 9] {
            t.mark_read(id);
        }
        assert_eq!(t.compacted_read_list(), "1-3,5,7-9");
    }

    #[test]
    fn empty_read_list_compacts_to_zero_zero() {
        let t = Topic::new_unloaded("x");
        assert_eq!(t.compacted_read_list(), "0-0");
    }

    #[test]
    fn mark_unread_removes_from_compaction() {
        let mut t = Topic::new_unloaded("x");
        t.apply_info_line(r#"1,9,9,"X",0,0"#).unwrap();
        t.mark_read(5);
        t.mark_unread(5);
        assert!(!t.is_read(5));
        assert_eq!(t.compacted_read_list(), "0-0");
    }
}
