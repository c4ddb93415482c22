//! Insertion-ordered counting.
//!
//! Rankings break ties by first appearance in the input, so the counter must
//! remember the order in which keys were first seen. A plain `HashMap` does
//! not.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl OrderedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        self.add_count(key, 1);
    }

    /// Add `count` occurrences of `key` at once.
    pub fn add_count(&mut self, key: &str, count: u64) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += count,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), count));
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map(|&pos| self.entries[pos].1).unwrap_or(0)
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }

    /// The `limit` most frequent keys, count descending, first-seen first on ties.
    pub fn top(&self, limit: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, which is what preserves first-seen order on ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

/// Index of the first maximum in `counts`. Returns 0 for empty or all-zero input.
pub fn first_max_index(counts: &[u64]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let mut counter = OrderedCounter::new();
        for key in ["b", "a", "b", "c", "a", "b"] {
            counter.add(key);
        }

        assert_eq!(counter.len(), 3);
        assert_eq!(counter.get("b"), 3);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(
            counter.into_entries(),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_breaks_ties_by_first_seen() {
        let mut counter = OrderedCounter::new();
        for key in ["x", "y", "z", "z", "y", "w"] {
            counter.add(key);
        }

        let top = counter.top(3);

        assert_eq!(
            top,
            vec![
                ("y".to_string(), 2),
                ("z".to_string(), 2),
                ("x".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_first_max_index() {
        assert_eq!(first_max_index(&[1, 3, 3, 2]), 1);
        assert_eq!(first_max_index(&[0, 0, 0]), 0);
        assert_eq!(first_max_index(&[]), 0);
        assert_eq!(first_max_index(&[2, 1, 5]), 2);
    }
}
