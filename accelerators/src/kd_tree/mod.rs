//! KD Tree.

use order_stat::kth_by;
use photon_core::geometry::*;
use photon_core::photon::*;
use std::collections::BinaryHeap;

mod common;
pub use common::KdPhotonNode;
use common::*;

/// A balanced kd-tree over deposited photons answering bounded k-nearest
/// neighbour queries. Built once; never modified afterwards.
#[derive(Clone, Debug, Default)]
pub struct KdPhotonTree {
    /// The photons, reordered so every leaf bucket is contiguous.
    photons: Vec<Photon>,

    /// The nodes in depth-first order. Empty when there are no photons.
    nodes: Vec<KdPhotonNode>,
}

impl KdPhotonTree {
    /// Build a kd-tree over the given photons. Each node splits its photons
    /// at the median along an axis cycling x, y, z with depth. Lists of at
    /// most one photon become leaves.
    ///
    /// * `photons` - The photons. The tree takes ownership of them.
    pub fn new(photons: Vec<Photon>) -> Self {
        let n_photons = photons.len();
        let mut tree = Self {
            photons,
            nodes: Vec::with_capacity(2 * n_photons),
        };

        if n_photons > 0 {
            let depth = tree.build_tree(0, n_photons, Axis::X);
            info!(
                "Built photon kd-tree with {} photons, {} nodes, depth {}",
                n_photons,
                tree.nodes.len(),
                depth
            );
        } else {
            info!("Built empty photon kd-tree");
        }

        tree
    }

    /// Recursively build the subtree for `photons[start..end]` and return its
    /// depth.
    ///
    /// * `start` - First photon in the subtree.
    /// * `end`   - One past the last photon in the subtree.
    /// * `axis`  - Split axis at this depth.
    fn build_tree(&mut self, start: usize, end: usize, axis: Axis) -> usize {
        let node_num = self.nodes.len();
        let n = end - start;

        // Initialize leaf node if termination criteria met.
        if n <= 1 {
            self.nodes.push(KdPhotonNode::new_leaf(start, n));
            return 1;
        }

        // Place the median on the axis; everything before it is at or below,
        // everything after it is at or above. For an even count the split is
        // halfway between the two middle photons.
        let w = &mut self.photons[start..end];
        let cmp = |a: &Photon, b: &Photon| a.p[axis].total_cmp(&b.p[axis]);
        let (mid, split_pos) = if n % 2 == 1 {
            let mid = n / 2;
            let median = kth_by(&mut *w, mid, cmp).p[axis];
            (mid, median)
        } else {
            let lower = n / 2 - 1;
            let lower_pos = kth_by(&mut *w, lower, cmp).p[axis];
            let upper_pos = w[lower + 1..]
                .iter()
                .map(|photon| photon.p[axis])
                .fold(Float::INFINITY, Float::min);
            (lower, 0.5 * (lower_pos + upper_pos))
        };

        // Recursively initialize children nodes. The child below the split
        // immediately follows this node.
        self.nodes.push(KdPhotonNode::new_leaf(start, 0));
        let below_depth = self.build_tree(start, start + mid + 1, axis + 1);
        let above_child = self.nodes.len();
        let above_depth = self.build_tree(start + mid + 1, end, axis + 1);
        self.nodes[node_num] = KdPhotonNode::new_interior(axis, above_child, split_pos);

        1 + below_depth.max(above_depth)
    }

    /// Returns the number of photons in the tree.
    pub fn len(&self) -> usize {
        self.photons.len()
    }

    /// Returns `true` if the tree holds no photons.
    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    /// Returns all photons in the tree, in tree order.
    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Returns up to `k` photons no farther than `max_dist` from `p`, nearest
    /// first. Ties in distance are broken arbitrarily.
    ///
    /// * `p`        - The query point.
    /// * `max_dist` - Maximum search radius.
    /// * `k`        - Maximum number of photons to return.
    pub fn find_nearest(&self, p: &Point3f, max_dist: Float, k: usize) -> Vec<Photon> {
        debug_assert!(max_dist >= 0.0, "negative search radius {max_dist}");
        if k == 0 || self.nodes.is_empty() {
            return vec![];
        }

        let mut heap = BinaryHeap::with_capacity(k + 1);
        self.search(0, p, max_dist * max_dist, k, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|ranked| self.photons[ranked.index])
            .collect()
    }

    /// Visit a subtree, keeping the `k` nearest photons seen so far in a
    /// max-heap.
    ///
    /// * `node_num`         - The subtree root.
    /// * `p`                - The query point.
    /// * `max_dist_squared` - Squared search radius.
    /// * `k`                - Capacity of the heap.
    /// * `heap`             - The nearest photons found so far.
    fn search(
        &self,
        node_num: usize,
        p: &Point3f,
        max_dist_squared: Float,
        k: usize,
        heap: &mut BinaryHeap<RankedPhoton>,
    ) {
        match self.nodes[node_num] {
            KdPhotonNode::Leaf {
                photons_offset,
                n_photons,
            } => {
                for index in photons_offset..photons_offset + n_photons {
                    let distance_squared = self.photons[index].p.distance_squared(p);
                    if distance_squared > max_dist_squared {
                        continue;
                    }
                    if heap.len() < k {
                        heap.push(RankedPhoton::new(distance_squared, index));
                    } else if heap.peek().map_or(false, |far| distance_squared < far.distance_squared.0) {
                        heap.pop();
                        heap.push(RankedPhoton::new(distance_squared, index));
                    }
                }
            }

            KdPhotonNode::Interior {
                split_pos,
                split_axis,
                above_child,
            } => {
                let delta = p[split_axis] - split_pos;
                let (near, far) = if delta < 0.0 {
                    (node_num + 1, above_child)
                } else {
                    (above_child, node_num + 1)
                };

                self.search(near, p, max_dist_squared, k, heap);

                // The far side can only help if the splitting plane is inside
                // the search radius and closer than the current farthest.
                let delta_squared = delta * delta;
                if delta_squared <= max_dist_squared
                    && (heap.len() < k || heap.peek().map_or(true, |far| delta_squared < far.distance_squared.0))
                {
                    self.search(far, p, max_dist_squared, k, heap);
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use photon_core::spectrum::*;
    use proptest::prelude::*;

    fn photon_at(x: Float, y: Float, z: Float) -> Photon {
        Photon::new(Point3f::new(x, y, z), Vector3f::new(0.0, -1.0, 0.0), Spectrum::new(1.0))
    }

    /// Returns the sorted squared distances of the `k` nearest photons within
    /// `max_dist` by checking every photon.
    fn brute_force(photons: &[Photon], p: &Point3f, max_dist: Float, k: usize) -> Vec<Float> {
        let mut d: Vec<Float> = photons
            .iter()
            .map(|photon| photon.p.distance_squared(p))
            .filter(|d| *d <= max_dist * max_dist)
            .collect();
        d.sort_by(|a, b| a.total_cmp(b));
        d.truncate(k);
        d
    }

    /// Checks the median ordering invariant for every interior node.
    fn check_invariant(tree: &KdPhotonTree, node_num: usize) -> (usize, usize) {
        match tree.nodes[node_num] {
            KdPhotonNode::Leaf {
                photons_offset,
                n_photons,
            } => (photons_offset, photons_offset + n_photons),
            KdPhotonNode::Interior {
                split_pos,
                split_axis,
                above_child,
            } => {
                let (below_start, below_end) = check_invariant(tree, node_num + 1);
                let (above_start, above_end) = check_invariant(tree, above_child);
                assert_eq!(below_end, above_start);
                for photon in &tree.photons[below_start..below_end] {
                    assert!(photon.p[split_axis] <= split_pos);
                }
                for photon in &tree.photons[above_start..above_end] {
                    assert!(photon.p[split_axis] >= split_pos);
                }
                (below_start, above_end)
            }
        }
    }

    prop_compose! {
        fn photon_strategy()(x in -1.0..1.0f32, y in -1.0..1.0f32, z in -1.0..1.0f32) -> Photon {
            photon_at(x, y, z)
        }
    }

    prop_compose! {
        fn query_point()(x in -1.2..1.2f32, y in -1.2..1.2f32, z in -1.2..1.2f32) -> Point3f {
            Point3f::new(x, y, z)
        }
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let tree = KdPhotonTree::new(vec![]);
        assert!(tree.is_empty());
        for k in 0..4 {
            assert!(tree.find_nearest(&Point3f::zero(), 10.0, k).is_empty());
        }
    }

    #[test]
    fn single_photon_is_always_found() {
        let photon = photon_at(0.3, -0.2, 0.1);
        let tree = KdPhotonTree::new(vec![photon]);
        for k in 1..4 {
            assert_eq!(tree.find_nearest(&Point3f::new(0.3, -0.2, 0.2), 1.0, k), vec![photon]);
        }
    }

    #[test]
    fn zero_k_returns_nothing() {
        let tree = KdPhotonTree::new(vec![photon_at(0.0, 0.0, 0.0), photon_at(1.0, 0.0, 0.0)]);
        assert!(tree.find_nearest(&Point3f::zero(), 10.0, 0).is_empty());
    }

    #[test]
    fn results_are_nearest_first() {
        let photons: Vec<Photon> = (0..10).map(|i| photon_at(i as Float, 0.0, 0.0)).collect();
        let tree = KdPhotonTree::new(photons);
        let found = tree.find_nearest(&Point3f::new(3.2, 0.0, 0.0), 100.0, 4);
        let xs: Vec<Float> = found.iter().map(|photon| photon.p.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn radius_limits_results() {
        let photons: Vec<Photon> = (0..10).map(|i| photon_at(i as Float, 0.0, 0.0)).collect();
        let tree = KdPhotonTree::new(photons);
        let found = tree.find_nearest(&Point3f::new(0.0, 0.0, 0.0), 1.5, 5);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn duplicate_positions() {
        let photons: Vec<Photon> = (0..7).map(|_| photon_at(0.5, 0.5, 0.5)).collect();
        let tree = KdPhotonTree::new(photons);
        check_invariant(&tree, 0);
        assert_eq!(tree.find_nearest(&Point3f::zero(), 2.0, 3).len(), 3);
        assert_eq!(tree.find_nearest(&Point3f::zero(), 2.0, 10).len(), 7);
    }

    proptest! {
        #[test]
        fn build_keeps_median_invariant(photons in prop::collection::vec(photon_strategy(), 1..200)) {
            let n = photons.len();
            let tree = KdPhotonTree::new(photons);
            prop_assert_eq!(check_invariant(&tree, 0), (0, n));
        }

        #[test]
        fn matches_brute_force(
            photons in prop::collection::vec(photon_strategy(), 0..200),
            p in query_point(),
            max_dist in 0.05..2.0f32,
            k in 0..12usize,
        ) {
            let expected = brute_force(&photons, &p, max_dist, k);
            let tree = KdPhotonTree::new(photons);
            let found: Vec<Float> = tree
                .find_nearest(&p, max_dist, k)
                .iter()
                .map(|photon| photon.p.distance_squared(&p))
                .collect();
            prop_assert!(found.len() <= k);
            prop_assert_eq!(found, expected);
        }
    }
}
