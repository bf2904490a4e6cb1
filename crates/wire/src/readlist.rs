/// Compacts a set of ids into the wire's run-length form: sorted runs
/// joined by commas, each run either `a` (singleton) or `a-b` (inclusive
/// range). An empty set compacts to `0-0`.
pub fn compact(ids: &std::collections::BTreeSet<u64>) -> String {
    if ids.is_empty() {
        return "0-0".to_string();
    }
    let mut runs = Vec::new();
    let mut iter = ids.iter().copied();
    let mut start = iter.next().unwrap();
    let mut end = start;
    for id in iter {
        if id == end + 1 {
            end = id;
        } else {
            runs.push((start, end));
            start = id;
            end = id;
        }
    }
    runs.push((start, end));
    runs.iter()
        .map(|(a, b)| if a == b { a.to_string() } else { format!("{a}-{b}") })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the wire run-length form back into a set of ids. `0-0` parses to
/// the empty set.
pub fn parse(s: &str) -> std::collections::BTreeSet<u64> {
    let mut ids = std::collections::BTreeSet::new();
    for run in s.split(',') {
        let run = run.trim();
        if run.is_empty() {
            continue;
        }
        match run.split_once('-') {
            Some(("0", "0")) => {}
            Some((a, b)) => {
                if let (Ok(a), Ok(b)) = (a.parse::<u64>(), b.parse::<u64>()) {
                    ids.extend(a..=b);
                }
            }
            None => {
                if let Ok(v) = run.parse::<u64>() {
                    ids.insert(v);
                }
            }
        }
    }
    ids
}

/// Drops ids below `floor`, matching the compactor's floor-clamping rule.
pub fn clamp_floor(ids: &std::collections::BTreeSet<u64>, floor: u64) -> std::collections::BTreeSet<u64> {
    ids.iter().copied().filter(|&id| id >= floor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn compacts_runs_and_singletons() {
        let ids: BTreeSet<u64> = [1, 2, 3, 5, 7, 8, 9].into_iter().collect();
        assert_eq!(compact(&ids), "1-3,5,7-9");
    }

    #[test]
    fn compacts_empty_set() {
        let ids: BTreeSet<u64> = BTreeSet::new();
        assert_eq!(compact(&ids), "0-0");
    }

    #[test]
    fn round_trips_through_parse() {
        let original: BTreeSet<u64> = [1, 2, 3, 5, 7, 8, 9].into_iter().collect();
        let s = compact(&original);
        let parsed = parse(&s);
        assert_eq!(parsed, original);
        assert_eq!(compact(&parsed), s);
    }

    #[test]
    fn parses_zero_zero_as_empty() {
        assert!(parse("0-0").is_empty());
    }

    #[test]
    fn clamp_floor_drops_low_ids() {
        let ids: BTreeSet<u64> = [1, 2, 3, 5].into_iter().collect();
        let clamped = clamp_floor(&ids, 3);
        assert_eq!(clamped, [3, 5].into_iter().collect());
    }
}
