/// A case-insensitive, order-preserving, duplicate-permitting header map.
///
/// Iteration yields every occurrence in insertion order; lookup is
/// case-insensitive in the key, matching the way the legacy wire protocol
/// returns header bundles.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`, case-insensitive, or `None`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name` in insertion order, case-insensitive.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a block of `Name: value` lines (as returned by a `HEAD`-style
    /// fetch) into a header map, in order, tolerating duplicate names.
    pub fn parse(lines: &[String]) -> Self {
        let mut map = Self::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                map.insert(name.trim(), value.trim());
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order_and_duplicates() {
        let lines = vec![
            "Subject: hi".to_string(),
            "Received: a".to_string(),
            "Received: b".to_string(),
        ];
        let map = HeaderMap::parse(&lines);
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("Subject", "hi"), ("Received", "a"), ("Received", "b")]
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert("Subject", "hi");
        assert_eq!(map.first("subject"), Some("hi"));
        assert_eq!(map.first("SUBJECT"), Some("hi"));
    }

    #[test]
    fn all_returns_every_occurrence_in_order() {
        let mut map = HeaderMap::new();
        map.insert("Received", "a");
        map.insert("Received", "b");
        assert_eq!(map.all("received"), vec!["a", "b"]);
    }
}
