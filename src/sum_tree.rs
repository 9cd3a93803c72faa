//! Sum tree for proportional sampling.
use crate::error::ReplayError;

/// A fixed-capacity binary sum tree over priority weights.
///
/// The tree is stored as a 0-indexed array heap of `2N - 1` nodes: the root
/// at position 0, leaf `i` at position `N - 1 + i`. Every internal node holds
/// the sum of its children, so the root is the total of all leaves. Updating
/// a leaf propagates the difference up to the root, and drawing a weighted
/// index walks down from the root, which makes both operations O(log N)
/// without materializing a cumulative distribution.
///
/// Leaf indices correspond one-to-one to physical storage slots of the ring
/// buffer of equal capacity; the tree itself is unsynchronized and relies on
/// its owner for exclusive access.
pub struct SumTree {
    capacity: usize,
    tree: Vec<f32>,
}

impl SumTree {
    /// Creates a tree with all leaf weights at zero.
    ///
    /// # Errors
    ///
    /// Fails if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ReplayError> {
        if capacity == 0 {
            return Err(ReplayError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            tree: vec![0f32; 2 * capacity - 1],
        })
    }

    /// Returns the number of leaves.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the sum of all leaf weights.
    pub fn total(&self) -> f32 {
        self.tree[0]
    }

    /// Sets the weight of leaf `index`, updating ancestor sums.
    ///
    /// # Errors
    ///
    /// Fails if `index >= capacity()`.
    pub fn set(&mut self, index: usize, priority: f32) -> Result<(), ReplayError> {
        if index >= self.capacity {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.capacity,
            });
        }
        let leaf = self.capacity - 1 + index;
        let delta = priority - self.tree[leaf];
        self.tree[leaf] = priority;

        // walk the parents back to the root, adding the delta at each
        let mut ix = leaf;
        while ix > 0 {
            ix = (ix - 1) / 2;
            self.tree[ix] += delta;
        }
        Ok(())
    }

    /// Returns the weight of leaf `index`.
    ///
    /// # Errors
    ///
    /// Fails if `index >= capacity()`.
    pub fn get(&self, index: usize) -> Result<f32, ReplayError> {
        if index >= self.capacity {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.capacity,
            });
        }
        Ok(self.tree[self.capacity - 1 + index])
    }

    /// Returns the leaf index whose cumulative weight interval contains
    /// `value`.
    ///
    /// Descends from the root: go left when `value` is below the left
    /// subtree's sum, otherwise subtract it and go right. This is inverse-CDF
    /// sampling over the leaf weights; drawing `value` uniformly from
    /// `[0, total())` selects each leaf with probability proportional to its
    /// weight.
    ///
    /// # Errors
    ///
    /// Fails if `value` is outside `[0, total()]`.
    pub fn sample(&self, value: f32) -> Result<usize, ReplayError> {
        if !(0f32..=self.total()).contains(&value) {
            return Err(ReplayError::SampleValueOutOfRange {
                value,
                total: self.total(),
            });
        }
        let mut value = value;
        let mut ix = 0;
        while ix < self.capacity - 1 {
            let left = 2 * ix + 1;
            if value < self.tree[left] {
                ix = left;
            } else {
                value -= self.tree[left];
                ix = left + 1;
            }
        }
        Ok(ix - (self.capacity - 1))
    }
}
