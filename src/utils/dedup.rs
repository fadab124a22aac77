use std::collections::HashSet;
use std::hash::Hash;

/// Keep the first occurrence per key, preserving input order.
pub fn dedup_first_by<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let items = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e")];
        let deduped = dedup_first_by(items, |(k, _)| *k);

        assert_eq!(deduped, vec![(1, "a"), (2, "b"), (3, "d")]);
    }

    #[test]
    fn test_empty_input() {
        let deduped = dedup_first_by(Vec::<(u8, u8)>::new(), |(k, _)| *k);
        assert!(deduped.is_empty());
    }

    #[test]
    fn test_string_keys() {
        let items = vec!["x_1", "y_1", "x_2"];
        let deduped = dedup_first_by(items, |s| s.split('_').next().map(str::to_string));

        assert_eq!(deduped, vec!["x_1", "y_1"]);
    }
}
