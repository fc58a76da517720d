//! Categories
//!
//! Product category ids and a small sorted set used for category requirements.

use std::cmp::Ordering;

use smallvec::SmallVec;

/// Product category identifier, as assigned by the host catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(pub u64);

/// A sorted, de-duplicated set of category ids.
///
/// Most products sit in a handful of categories, so the ids live inline in a
/// `SmallVec` and set operations walk both sides in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    ids: SmallVec<[CategoryId; 4]>,
}

impl CategorySet {
    /// Create a new category set, sorting and de-duplicating the ids.
    #[must_use]
    pub fn new(ids: SmallVec<[CategoryId; 4]>) -> Self {
        let mut set = Self { ids };

        set.ids.sort_unstable();
        set.ids.dedup();

        set
    }

    /// Create an empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ids: SmallVec::new(),
        }
    }

    /// Create a set from raw ids.
    pub fn from_ids(ids: &[u64]) -> Self {
        ids.iter().copied().map(CategoryId).collect()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterate the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.ids.iter().copied()
    }

    /// Returns true if both sets share at least one id.
    pub fn intersects(&self, other: &Self) -> bool {
        // Both sides are sorted, so a merge walk is O(n + m).
        let mut left = self.ids.iter();
        let mut right = other.ids.iter();
        let mut left_id = left.next();
        let mut right_id = right.next();

        while let (Some(l), Some(r)) = (left_id, right_id) {
            match l.cmp(r) {
                Ordering::Equal => return true,
                Ordering::Less => left_id = left.next(),
                Ordering::Greater => right_id = right.next(),
            }
        }

        false
    }
}

impl FromIterator<CategoryId> for CategorySet {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_and_dedups() {
        let set = CategorySet::from_ids(&[9, 3, 9, 1]);

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![CategoryId(1), CategoryId(3), CategoryId(9)]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn intersects_finds_shared_id() {
        let required = CategorySet::from_ids(&[7]);

        assert!(!CategorySet::from_ids(&[3, 9]).intersects(&required));
        assert!(CategorySet::from_ids(&[7, 2]).intersects(&required));
    }

    #[test]
    fn intersects_is_false_when_either_side_is_empty() {
        let set = CategorySet::from_ids(&[1, 2]);

        assert!(!set.intersects(&CategorySet::empty()));
        assert!(!CategorySet::empty().intersects(&set));
    }
}
