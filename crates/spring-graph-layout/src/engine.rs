//! The Fruchterman-Reingold simulation loop.

use spring_graph_core::{sample_position, seeded_rng, Graph, Vec2};
use tracing::debug;

use crate::error::{LayoutError, LayoutResult};
use crate::repulsion::{BruteForce, RepulsiveStrategy};
use crate::{MIN_DISPLACEMENT, MIN_DISTANCE, MIN_TEMPERATURE};

/// Owns the simulation state for one layout run.
///
/// `initialize` scatters the nodes and derives the optimal distance k;
/// each `step` then executes one annealing iteration in a fixed order:
/// reset, repulsion, attraction, clamped application, cooling. Forces are
/// always evaluated against the position snapshot from the start of the
/// step, and a step that produces a non-finite displacement fails without
/// moving any node.
pub struct LayoutEngine {
    width: f32,
    height: f32,
    scaling: f32,
    k: f32,
    temperature: f32,
    cooling_rate: f32,
    last_kinetic_energy: f32,
    strategy: Box<dyn RepulsiveStrategy>,
    // Scratch buffers reused across steps; the hot path must not allocate
    // once they reach their high-water mark.
    edge_scratch: Vec<(usize, usize)>,
    position_scratch: Vec<Vec2>,
}

impl LayoutEngine {
    /// Creates an engine for the frame `[0, width] x [0, height]` with
    /// scaling constant `scaling` (the C in k = C * sqrt(area / |V|)).
    /// The default repulsive strategy is the exact [`BruteForce`].
    pub fn new(width: f32, height: f32, scaling: f32) -> LayoutResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::InvalidFrame { width, height });
        }
        if !scaling.is_finite() || scaling <= 0.0 {
            return Err(LayoutError::InvalidScaling(scaling));
        }
        Ok(Self {
            width,
            height,
            scaling,
            k: 1.0,
            temperature: 1.0,
            cooling_rate: 0.95,
            last_kinetic_energy: 0.0,
            strategy: Box::new(BruteForce),
            edge_scratch: Vec::new(),
            position_scratch: Vec::new(),
        })
    }

    /// Swaps the repulsive strategy at runtime.
    pub fn set_repulsive_strategy(&mut self, strategy: Box<dyn RepulsiveStrategy>) {
        self.strategy = strategy;
    }

    pub fn set_temperature(&mut self, t: f32) {
        self.temperature = t;
    }

    pub fn set_cooling_rate(&mut self, rate: f32) {
        self.cooling_rate = rate;
    }

    /// Current annealing temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Total clamped displacement applied by the most recent step.
    pub fn kinetic_energy(&self) -> f32 {
        self.last_kinetic_energy
    }

    /// Optimal inter-node distance k, derived by `initialize`.
    pub fn optimal_distance(&self) -> f32 {
        self.k
    }

    /// Scatters every node uniformly at random inside the frame and
    /// computes k = C * sqrt(W * H / |V|).
    ///
    /// Positions are drawn x-then-y per node, in node-sequence order, from
    /// a ChaCha8 stream; a fixed `seed` therefore reproduces the exact
    /// same starting layout.
    pub fn initialize(&mut self, graph: &mut Graph, seed: Option<u64>) -> LayoutResult<()> {
        let n = graph.vertex_count();
        if n == 0 {
            return Err(LayoutError::EmptyGraph);
        }

        let area = self.width * self.height;
        self.k = self.scaling * (area / n as f32).sqrt();

        let mut rng = seeded_rng(seed);
        for v in graph.nodes_mut() {
            v.position = sample_position(&mut rng, self.width, self.height);
        }
        self.last_kinetic_energy = 0.0;

        debug!(vertices = n, k = self.k, "layout initialized");
        Ok(())
    }

    /// Executes one full Fruchterman-Reingold iteration:
    ///
    /// 1. Reset displacement accumulators.
    /// 2. Repulsive forces (delegated to the strategy).
    /// 3. Attractive forces along edges only.
    /// 4. Clamp each displacement to the temperature, apply it, clamp the
    ///    position to the frame; accumulate the kinetic energy.
    /// 5. Record the energy and cool the temperature.
    pub fn step(&mut self, graph: &mut Graph) -> LayoutResult<()> {
        if graph.vertex_count() == 0 {
            return Err(LayoutError::EmptyGraph);
        }

        for v in graph.nodes_mut() {
            v.reset_displacement();
        }

        self.strategy.compute_repulsive(graph.nodes_mut(), self.k)?;

        // Attraction: f_a(d) = d²/k along the unit direction, which
        // collapses to delta * (d / k). Edge endpoints are resolved to
        // node indices up front so the update can borrow the node slice
        // mutably; self-loops cannot be constructed but are skipped here
        // anyway.
        self.edge_scratch.clear();
        for e in graph.edges() {
            if let (Some(u), Some(v)) = (graph.index_of(e.source), graph.index_of(e.target)) {
                if u != v {
                    self.edge_scratch.push((u, v));
                }
            }
        }

        let k = self.k;
        let nodes = graph.nodes_mut();
        for &(ui, vi) in &self.edge_scratch {
            let delta = nodes[ui].position - nodes[vi].position;
            let dist = delta.length();
            if dist < MIN_DISTANCE {
                continue;
            }
            let force = delta * (dist / k);
            nodes[ui].displacement -= force;
            nodes[vi].displacement += force;
        }

        // Apply with the temperature clamp. New positions are staged in a
        // scratch buffer and only committed once every candidate is known
        // to be finite, so a failed step leaves the graph untouched.
        self.position_scratch.clear();
        let t = self.temperature;
        let mut energy = 0.0f32;
        for v in graph.nodes() {
            let len = v.displacement.length();
            if !len.is_finite() {
                return Err(LayoutError::NonFinite { node: v.id });
            }
            let mut pos = v.position;
            if len > MIN_DISPLACEMENT {
                let clamped = len.min(t);
                pos += v.displacement / len * clamped;
                energy += clamped;
            }
            pos.x = pos.x.clamp(0.0, self.width);
            pos.y = pos.y.clamp(0.0, self.height);
            if !pos.is_finite() {
                return Err(LayoutError::NonFinite { node: v.id });
            }
            self.position_scratch.push(pos);
        }
        for (v, &pos) in graph.nodes_mut().iter_mut().zip(self.position_scratch.iter()) {
            v.position = pos;
        }

        self.last_kinetic_energy = energy;
        self.temperature = (self.temperature * self.cooling_rate).max(MIN_TEMPERATURE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_frames_and_scaling() {
        assert!(matches!(
            LayoutEngine::new(0.0, 100.0, 1.0),
            Err(LayoutError::InvalidFrame { .. })
        ));
        assert!(matches!(
            LayoutEngine::new(100.0, -5.0, 1.0),
            Err(LayoutError::InvalidFrame { .. })
        ));
        assert!(matches!(
            LayoutEngine::new(f32::NAN, 100.0, 1.0),
            Err(LayoutError::InvalidFrame { .. })
        ));
        assert!(matches!(
            LayoutEngine::new(100.0, 100.0, 0.0),
            Err(LayoutError::InvalidScaling(_))
        ));
    }

    #[test]
    fn empty_graph_is_a_domain_error_and_leaves_engine_unmodified() {
        let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
        let mut g = Graph::new();
        assert!(matches!(
            engine.initialize(&mut g, Some(1)),
            Err(LayoutError::EmptyGraph)
        ));
        assert!(matches!(engine.step(&mut g), Err(LayoutError::EmptyGraph)));
        // k keeps its pre-initialize default.
        assert_eq!(engine.optimal_distance(), 1.0);
    }

    #[test]
    fn initialize_scatters_inside_the_frame_and_derives_k() {
        let mut engine = LayoutEngine::new(200.0, 50.0, 1.0).unwrap();
        let mut g = Graph::erdos_renyi(40, 0.1, Some(8)).unwrap();
        engine.initialize(&mut g, Some(123)).unwrap();

        let expected_k = (200.0f32 * 50.0 / 40.0).sqrt();
        assert!((engine.optimal_distance() - expected_k).abs() < 1e-4);
        assert_eq!(engine.kinetic_energy(), 0.0);
        for v in g.nodes() {
            assert!(v.position.x >= 0.0 && v.position.x <= 200.0);
            assert!(v.position.y >= 0.0 && v.position.y <= 50.0);
        }
    }

    #[test]
    fn initialize_is_deterministic_for_fixed_seed() {
        let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
        let mut a = Graph::erdos_renyi(25, 0.2, Some(4)).unwrap();
        let mut b = a.clone();
        engine.initialize(&mut a, Some(99)).unwrap();
        engine.initialize(&mut b, Some(99)).unwrap();
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.position.x.to_bits(), y.position.x.to_bits());
            assert_eq!(x.position.y.to_bits(), y.position.y.to_bits());
        }
    }

    #[test]
    fn cooling_is_geometric_with_a_floor() {
        let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
        let mut g = Graph::erdos_renyi(5, 0.5, Some(2)).unwrap();
        engine.initialize(&mut g, Some(2)).unwrap();

        engine.set_temperature(10.0);
        engine.set_cooling_rate(0.5);
        engine.step(&mut g).unwrap();
        assert!((engine.temperature() - 5.0).abs() < 1e-6);

        engine.set_temperature(MIN_TEMPERATURE);
        engine.step(&mut g).unwrap();
        assert_eq!(engine.temperature(), MIN_TEMPERATURE);
    }

    #[test]
    fn kinetic_energy_is_bounded_by_nodes_times_temperature() {
        let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
        let mut g = Graph::erdos_renyi(30, 0.2, Some(17)).unwrap();
        engine.initialize(&mut g, Some(17)).unwrap();
        engine.set_temperature(5.0);

        let t_pre = engine.temperature();
        engine.step(&mut g).unwrap();
        let e = engine.kinetic_energy();
        assert!(e >= 0.0);
        assert!(e <= t_pre * g.vertex_count() as f32 + 1e-3);
    }

    #[test]
    fn positions_stay_inside_the_frame_after_every_step() {
        let mut engine = LayoutEngine::new(120.0, 80.0, 1.0).unwrap();
        let mut g = Graph::erdos_renyi(25, 0.15, Some(3)).unwrap();
        engine.initialize(&mut g, Some(3)).unwrap();
        engine.set_temperature(50.0);

        for _ in 0..50 {
            engine.step(&mut g).unwrap();
            for v in g.nodes() {
                assert!(v.position.x >= 0.0 && v.position.x <= 120.0);
                assert!(v.position.y >= 0.0 && v.position.y <= 80.0);
            }
        }
    }

    #[test]
    fn single_vertex_graph_steps_without_motion() {
        let mut engine = LayoutEngine::new(10.0, 10.0, 1.0).unwrap();
        let mut g = Graph::new();
        g.add_vertex(0).unwrap();
        engine.initialize(&mut g, Some(5)).unwrap();
        let before = g.nodes()[0].position;
        engine.step(&mut g).unwrap();
        assert_eq!(g.nodes()[0].position, before);
        assert_eq!(engine.kinetic_energy(), 0.0);
    }
}
