use crate::error::MailError;

/// Whether a folder's cached attributes reflect the server (`Loaded`), have
/// never been fetched (`Fresh`), or were invalidated by a mutation and need
/// refetching (`Stale`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Fresh,
    Loaded,
    Stale,
}

#[derive(Debug, Clone)]
pub struct Folder {
    pub id: i64,
    name: String,
    count: i64,
    size: i64,
    state: LoadState,
}

impl Folder {
    pub fn new_fresh(id: i64) -> Self {
        Folder {
            id,
            name: String::new(),
            count: 0,
            size: 0,
            state: LoadState::Fresh,
        }
    }

    /// Parses a folder-info line of the form `id,count,"name",size`.
    pub fn parse_info_line(line: &str) -> Result<Folder, MailError> {
        let fields = split_csv_quoted(line);
        if fields.len() != 4 {
            return Err(MailError::InvalidFolderLine(line.to_string()));
        }
        let id: i64 = fields[0]
            .parse()
            .map_err(|_| MailError::InvalidFolderLine(line.to_string()))?;
        let count: i64 = fields[1]
            .parse()
            .map_err(|_| MailError::InvalidFolderLine(line.to_string()))?;
        let size: i64 = fields[3]
            .parse()
            .map_err(|_| MailError::InvalidFolderLine(line.to_string()))?;
        Ok(Folder {
            id,
            name: fields[2].clone(),
            count,
            size,
            state: LoadState::Loaded,
        })
    }

    pub fn apply_info_line(&mut self, line: &str) -> Result<(), MailError> {
        let parsed = Folder::parse_info_line(line)?;
        self.name = parsed.name;
        self.count = parsed.count;
        self.size = parsed.size;
        self.state = LoadState::Loaded;
        Ok(())
    }

    pub fn mark_stale(&mut self) {
        self.state = LoadState::Stale;
    }

    pub fn needs_reload(&self) -> bool {
        !matches!(self.state, LoadState::Loaded)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.state, LoadState::Stale)
    }
}

/// Splits a comma-separated line respecting double-quoted fields (which may
/// themselves contain commas).
pub(crate) fn split_csv_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut cur));
            }
            _ => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_folder_info_line_per_scenario_2() {
        let f = Folder::parse_info_line(r#"12,7,"INBOX",4096"#).unwrap();
        assert_eq!(f.id, 12);
        assert_eq!(f.count, 7);
        assert_eq!(f.name(), "INBOX");
        assert_eq!(f.size, 4096);
        assert!(!f.is_stale());
    }

    #[test]
    fn fresh_folder_needs_reload() {
        let f = Folder::new_fresh(1);
        assert!(f.needs_reload());
    }

    #[test]
    fn stale_after_mark_needs_reload() {
        let mut f = Folder::parse_info_line(r#"1,0,"Trash",0"#).unwrap();
        assert!(!f.needs_reload());
        f.mark_stale();
        assert!(f.needs_reload());
        assert!(f.is_stale());
    }

    #[test]
    fn rejects_malformed_line() {
        assert!(Folder::parse_info_line("not,enough").is_err());
    }
}
