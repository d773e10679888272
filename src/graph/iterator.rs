//! Point-in-time snapshots of store contents
//!
//! A [`Snapshot`] owns copies of the items that existed when it was taken.
//! Writers that run afterwards are invisible to it, and it never observes a
//! half-applied mutation.

/// Frozen, single-pass cursor over a fixed set of items
///
/// The cursor starts before the first item: call [`advance`](Self::advance)
/// before reading [`value`](Self::value). Once exhausted it stays exhausted;
/// take a new snapshot to iterate again.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    items: Vec<T>,
    /// Index of the current item; `None` before the first advance
    cursor: Option<usize>,
}

impl<T> Snapshot<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: None }
    }

    /// Move to the next item; returns false once no items remain
    pub fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c.saturating_add(1));
        // park one past the end so value() stays None after exhaustion
        self.cursor = Some(next.min(self.items.len()));
        next < self.items.len()
    }

    /// Current item, or `None` before the first advance and after exhaustion
    pub fn value(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.items.get(c))
    }

    /// Total number of items, fixed at construction
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the snapshot, returning every item regardless of cursor position
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> IntoIterator for Snapshot<T> {
    type Item = T;
    type IntoIter = std::iter::Skip<std::vec::IntoIter<T>>;

    /// Iterate over the items not yet visited by the cursor
    fn into_iter(self) -> Self::IntoIter {
        let visited = match self.cursor {
            None => 0,
            Some(c) => c.saturating_add(1).min(self.items.len()),
        };
        self.items.into_iter().skip(visited)
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(items: Vec<T>) -> Self {
        Snapshot::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_all_items() {
        let mut it = Snapshot::new(vec!["a", "b", "c"]);
        assert_eq!(it.size(), 3);

        let mut seen = Vec::new();
        while it.advance() {
            seen.push(*it.value().unwrap());
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_value_before_first_advance() {
        let it = Snapshot::new(vec![1, 2]);
        assert!(it.value().is_none());
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let mut it = Snapshot::new(vec![1]);
        assert!(it.advance());
        assert_eq!(it.value(), Some(&1));
        assert!(!it.advance());
        assert!(it.value().is_none());
        assert!(!it.advance());
        assert!(it.value().is_none());
        assert_eq!(it.size(), 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let mut it: Snapshot<u8> = Snapshot::new(Vec::new());
        assert!(it.is_empty());
        assert!(!it.advance());
        assert!(it.value().is_none());
    }

    #[test]
    fn test_into_iter_skips_visited() {
        let mut it = Snapshot::new(vec![1, 2, 3, 4]);
        it.advance();
        it.advance();
        let rest: Vec<_> = it.into_iter().collect();
        assert_eq!(rest, vec![3, 4]);

        let fresh: Vec<_> = Snapshot::new(vec![1, 2]).into_iter().collect();
        assert_eq!(fresh, vec![1, 2]);
    }

    #[test]
    fn test_snapshot_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Snapshot<String>>();
    }
}
