use wire::HeaderMap;

use crate::error::BulletinError;

#[derive(Debug, Clone)]
pub struct Article {
    pub id: u64,
    pub headers: HeaderMap,
}

/// Parses a combined `XHEAD` multi-line payload into per-article bundles.
/// Each bundle's first line is the bare article id, followed by header
/// lines, with blank lines separating consecutive articles.
pub fn parse_xhead_payload(lines: &[String]) -> Result<Vec<Article>, BulletinError> {
    let mut articles = Vec::new();
    let mut iter = lines.iter().peekable();
    while let Some(id_line) = iter.next() {
        if id_line.is_empty() {
            continue;
        }
        let id: u64 = id_line
            .trim()
            .parse()
            .map_err(|_| BulletinError::InvalidArticleBlock)?;
        let mut headers = HeaderMap::new();
        while let Some(next) = iter.peek() {
            if next.is_empty() {
                iter.next();
                break;
            }
            let line = iter.next().unwrap();
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim(), value.trim());
            }
        }
        articles.push(Article { id, headers });
    }
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_article_blocks() {
        let lines: Vec<String> = vec![
            "42".into(),
            "Subject: hello".into(),
            "From: alice".into(),
            "".into(),
            "43".into(),
            "Subject: world".into(),
        ]
        .into_iter()
        .collect();
        let articles = parse_xhead_payload(&lines).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, 42);
        assert_eq!(articles[0].headers.first("subject"), Some("hello"));
        assert_eq!(articles[1].id, 43);
        assert_eq!(articles[1].headers.first("subject"), Some("world"));
    }
}
