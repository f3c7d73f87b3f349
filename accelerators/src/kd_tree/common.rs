//! KD Tree Common

use ordered_float::OrderedFloat;
use photon_core::pbrt::{Axis, Float};
use std::cmp::Ordering;

/// Stores information about nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KdPhotonNode {
    Interior {
        /// Median coordinate along the split axis.
        split_pos: Float,

        /// Split axis.
        split_axis: Axis,

        /// The position in the nodes list of the child holding photons at or
        /// above the median. The child below the median always follows its
        /// parent directly.
        above_child: usize,
    },

    Leaf {
        /// Offset of the first photon of the bucket.
        photons_offset: usize,

        /// Number of photons in the bucket.
        n_photons: usize,
    },
}

impl KdPhotonNode {
    /// Initialize a leaf node.
    ///
    /// * `photons_offset` - Offset of the first photon of the bucket.
    /// * `n_photons`      - Number of photons in the bucket.
    pub fn new_leaf(photons_offset: usize, n_photons: usize) -> Self {
        Self::Leaf {
            photons_offset,
            n_photons,
        }
    }

    /// Initialize an interior node.
    ///
    /// * `axis`  - Axis of split.
    /// * `ac`    - Index of child holding photons at or above the median.
    /// * `split` - Median along `axis`.
    pub fn new_interior(axis: Axis, ac: usize, split: Float) -> Self {
        Self::Interior {
            above_child: ac,
            split_axis: axis,
            split_pos: split,
        }
    }
}

/// A photon index paired with its squared distance to a query point. Ordered
/// by distance so a `BinaryHeap` keeps the farthest candidate on top.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RankedPhoton {
    /// Squared distance to the query point.
    pub(crate) distance_squared: OrderedFloat<Float>,

    /// Index into the tree's photons.
    pub(crate) index: usize,
}

impl RankedPhoton {
    /// Create a new `RankedPhoton`.
    ///
    /// * `distance_squared` - Squared distance to the query point.
    /// * `index`            - Index into the tree's photons.
    pub(crate) fn new(distance_squared: Float, index: usize) -> Self {
        Self {
            distance_squared: OrderedFloat(distance_squared),
            index,
        }
    }
}

impl PartialEq for RankedPhoton {
    fn eq(&self, other: &Self) -> bool {
        self.distance_squared == other.distance_squared
    }
}

impl Eq for RankedPhoton {}

impl PartialOrd for RankedPhoton {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedPhoton {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_squared.cmp(&other.distance_squared)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_keeps_farthest_on_top() {
        let mut heap = BinaryHeap::new();
        heap.push(RankedPhoton::new(0.5, 0));
        heap.push(RankedPhoton::new(2.0, 1));
        heap.push(RankedPhoton::new(1.0, 2));
        assert_eq!(heap.peek().map(|r| r.index), Some(1));

        let order: Vec<usize> = heap.into_sorted_vec().iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 2, 1]);
    }
}
