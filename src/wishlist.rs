use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    ids: BTreeSet<u64>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the id if absent, removes it if present. Returns whether it is now wished for.
    pub fn toggle(&mut self, product_id: u64) -> bool {
        if self.ids.remove(&product_id) {
            false
        } else {
            self.ids.insert(product_id)
        }
    }

    pub fn contains(&self, product_id: u64) -> bool {
        self.ids.contains(&product_id)
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<u64> for Wishlist {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_membership() {
        let mut wishlist: Wishlist = [4, 9].into_iter().collect();
        let before = wishlist.clone();

        assert!(wishlist.toggle(5));
        assert!(!wishlist.toggle(5));
        assert_eq!(wishlist, before);

        assert!(!wishlist.toggle(4));
        assert!(wishlist.toggle(4));
        assert_eq!(wishlist, before);
    }

    #[test]
    fn persisted_as_array_and_dedups() {
        let wishlist: Wishlist = serde_json::from_str("[3, 1, 3]").unwrap();

        assert_eq!(wishlist.len(), 2);
        assert_eq!(wishlist.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(serde_json::to_string(&wishlist).unwrap(), "[1,3]");
    }
}
