//! Level Index
//!
//! Sorted list of the level sizes present in a finished mipmap chain.

use smallvec::SmallVec;

/// Ascending list of distinct level sizes.
///
/// A chain for the largest supported texture has 11 levels, so the index
/// never spills to the heap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelIndex {
    sizes: SmallVec<[u32; 12]>,
}

impl LevelIndex {
    /// Build an index from level sizes in any order
    pub fn from_sizes(sizes: impl IntoIterator<Item = u32>) -> Self {
        let mut sizes: SmallVec<[u32; 12]> = sizes.into_iter().collect();
        sizes.sort();
        sizes.dedup();
        Self { sizes }
    }

    /// Level sizes, smallest first
    pub fn sizes_ascending(&self) -> &[u32] {
        &self.sizes
    }

    /// Size of the level at `index`, counted from the smallest level when
    /// `ascending` is set and from the largest otherwise
    pub fn size_at(&self, index: usize, ascending: bool) -> Option<u32> {
        if index >= self.sizes.len() {
            return None;
        }
        let position = if ascending {
            index
        } else {
            self.sizes.len() - index - 1
        };
        Some(self.sizes[position])
    }

    /// Level sizes in the requested order
    pub fn iter(&self, ascending: bool) -> impl Iterator<Item = u32> + '_ {
        let len = self.sizes.len();
        (0..len).filter_map(move |i| self.size_at(i, ascending))
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
    }
}
