//! Repulsive-force strategies.
//!
//! Both strategies accumulate `(k²/d²)·delta` per unordered node pair into
//! the node displacement fields; they differ only in how pairs are
//! enumerated. `BruteForce` is the exact reference, `BarnesHut` collapses
//! far-away subtrees into their center of mass.

use spring_graph_core::{Node, Vec2};

use crate::bounds::BoundingBox;
use crate::error::LayoutResult;
use crate::quadtree::{QuadTree, NULL_CHILD};
use crate::{BOUNDS_MARGIN, DEFAULT_THETA, MIN_DISTANCE};

/// Capability for accumulating repulsive displacement into every node.
///
/// Implementations never touch graph topology or node ids, only the
/// displacement accumulators.
pub trait RepulsiveStrategy {
    fn compute_repulsive(&mut self, nodes: &mut [Node], k: f32) -> LayoutResult<()>;
}

/// Exact O(|V|²) pairwise repulsion.
///
/// Pairs are enumerated in ascending (i, j) index order and each force is
/// applied to both endpoints, so the result is exactly antisymmetric.
#[derive(Debug, Default)]
pub struct BruteForce;

impl RepulsiveStrategy for BruteForce {
    fn compute_repulsive(&mut self, nodes: &mut [Node], k: f32) -> LayoutResult<()> {
        let k2 = k * k;
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let mut delta = nodes[i].position - nodes[j].position;
                let mut dist = delta.length();
                if dist < MIN_DISTANCE {
                    dist = MIN_DISTANCE;
                    delta = Vec2::new(MIN_DISTANCE, 0.0);
                }

                // f_r(d) = k²/d, applied along delta/d.
                let force = delta * (k2 / (dist * dist));
                nodes[i].displacement += force;
                nodes[j].displacement -= force;
            }
        }
        Ok(())
    }
}

/// O(|V| log |V|) Barnes-Hut approximation.
///
/// Each call rebuilds the owned quadtree over the current positions (the
/// cell pool is reused across calls) and then walks it once per node,
/// accepting any cell whose size-to-distance ratio drops below `theta`.
/// `theta = 0` forces full recursion to the leaves and reproduces the
/// brute-force forces; `theta = 0.5` is the standard trade-off.
#[derive(Debug)]
pub struct BarnesHut {
    theta: f32,
    tree: QuadTree,
}

impl BarnesHut {
    /// Placeholder root; every `compute_repulsive` call resets the tree to
    /// the tight bounds of the current positions.
    pub fn new(theta: f32) -> Self {
        Self {
            theta,
            tree: QuadTree::new(BoundingBox::new(Vec2::ZERO, 1.0, 1.0), 512),
        }
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f32) {
        self.theta = theta;
    }

    /// Tight bounding box over the node positions, padded by a fixed
    /// margin so boundary points are strictly interior to the root.
    fn compute_bounds(nodes: &[Node]) -> BoundingBox {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for v in nodes {
            min_x = min_x.min(v.position.x);
            min_y = min_y.min(v.position.y);
            max_x = max_x.max(v.position.x);
            max_y = max_y.max(v.position.y);
        }
        BoundingBox::new(
            Vec2::new((min_x + max_x) * 0.5, (min_y + max_y) * 0.5),
            (max_x - min_x) * 0.5 + BOUNDS_MARGIN,
            (max_y - min_y) * 0.5 + BOUNDS_MARGIN,
        )
    }

    /// Net repulsive force on a query point, walking down from `idx`.
    fn query(&self, idx: u32, pos: Vec2, self_id: u32, k2: f32) -> Vec2 {
        let cell = self.tree.cell(idx);
        if cell.total_mass < 0.5 {
            return Vec2::ZERO;
        }

        let mut delta = pos - cell.center_of_mass;
        let mut dist = delta.length();
        if dist < MIN_DISTANCE {
            dist = MIN_DISTANCE;
            delta = Vec2::new(MIN_DISTANCE, 0.0);
        }

        if cell.is_leaf() {
            let mut mass = cell.total_mass;
            if cell.has_point && cell.point_id == self_id {
                // Self-exclusion. A unit leaf holding only the query node
                // contributes nothing; a depth-capped bucket drops the
                // query node's own unit of mass.
                mass -= 1.0;
                if mass < 0.5 {
                    return Vec2::ZERO;
                }
            }
            // Each constituent contributes (k²/d²)·delta independently.
            return delta * (mass * k2 / (dist * dist));
        }

        // Acceptance: treat the whole subtree as a super-node at its
        // center of mass once s/d < theta.
        let s = cell.bounds.size();
        if s / dist < self.theta {
            return delta * (cell.total_mass * k2 / (dist * dist));
        }

        let mut total = Vec2::ZERO;
        for &child in &cell.children {
            if child != NULL_CHILD {
                total += self.query(child, pos, self_id, k2);
            }
        }
        total
    }
}

impl Default for BarnesHut {
    fn default() -> Self {
        Self::new(DEFAULT_THETA)
    }
}

impl RepulsiveStrategy for BarnesHut {
    fn compute_repulsive(&mut self, nodes: &mut [Node], k: f32) -> LayoutResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }

        let bounds = Self::compute_bounds(nodes);
        self.tree.reset(bounds);
        for v in nodes.iter() {
            self.tree.insert(v.position, v.id)?;
        }

        let k2 = k * k;
        for v in nodes.iter_mut() {
            v.displacement += self.query(0, v.position, v.id, k2);
        }
        Ok(())
    }
}
