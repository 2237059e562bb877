//! Ordered, editable list of test names for the next run

use crate::common::{Error, Result};

/// The ordered list of test names a submission will carry.
///
/// Seeded from the server's default order; the operator can move, remove,
/// and append entries before submitting. `append` itself does not enforce
/// uniqueness; the orchestrator's suggestion path does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOrderModel {
    names: Vec<String>,
}

impl TestOrderModel {
    /// Seed the order from the catalog's default sequence
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Current order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Move the element at `from` to position `to`, shifting the elements
    /// in between by one. A stable single-element move, not a swap.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.names.len();
        let index = from.max(to);
        if from >= len || to >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        if from != to {
            let name = self.names.remove(from);
            self.names.insert(to, name);
        }
        Ok(())
    }

    /// Delete the element at `index`; later entries shift down by one
    pub fn remove(&mut self, index: usize) -> Result<String> {
        if index >= self.names.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.names.len(),
            });
        }
        Ok(self.names.remove(index))
    }

    /// Add a name to the end of the order
    pub fn append(&mut self, name: &str) {
        self.names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> TestOrderModel {
        TestOrderModel::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_reorder_is_stable_move() {
        let mut m = order(&["a", "b", "c", "d"]);
        m.reorder(0, 2).unwrap();
        assert_eq!(m.names(), ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_reorder_backwards() {
        let mut m = order(&["a", "b", "c", "d"]);
        m.reorder(3, 1).unwrap();
        assert_eq!(m.names(), ["a", "d", "b", "c"]);
    }

    #[test]
    fn test_reorder_inverts() {
        // A single-element move undone by the symmetric move restores
        // the original order.
        let original = order(&["a", "b", "c", "d", "e"]);
        for from in 0..5 {
            for to in 0..5 {
                let mut m = original.clone();
                m.reorder(from, to).unwrap();
                m.reorder(to, from).unwrap();
                assert_eq!(m, original, "move {from}->{to} did not invert");
            }
        }
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut m = order(&["a", "b"]);
        m.reorder(1, 1).unwrap();
        assert_eq!(m.names(), ["a", "b"]);
    }

    #[test]
    fn test_reorder_out_of_bounds() {
        let mut m = order(&["a", "b"]);
        assert!(m.reorder(0, 2).is_err());
        assert!(m.reorder(5, 0).is_err());
    }

    #[test]
    fn test_remove_shifts_down() {
        let mut m = order(&["a", "b", "c"]);
        assert_eq!(m.remove(1).unwrap(), "b");
        assert_eq!(m.names(), ["a", "c"]);
        assert!(m.remove(2).is_err());
    }

    #[test]
    fn test_append_allows_duplicates() {
        let mut m = order(&["a"]);
        m.append("a");
        assert_eq!(m.names(), ["a", "a"]);
    }
}
