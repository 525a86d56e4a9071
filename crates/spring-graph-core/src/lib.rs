//! Graph domain model shared across the spring-graph workspace.
//!
//! A [`Graph`] is an ordered sequence of [`Node`]s plus a set of canonical
//! undirected [`Edge`]s with a symmetric adjacency index. Layout code only
//! ever mutates node positions and displacements; topology is frozen once
//! constructed.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use rand::distributions::{Bernoulli, Distribution};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for nodes within a [`Graph`].
pub type NodeId = u32;

/// Result type for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building or querying a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Edge probability handed to the random generator is outside [0, 1].
    #[error("edge probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// A vertex with this id has already been added.
    #[error("vertex {0} already exists")]
    DuplicateVertex(NodeId),

    /// An operation referenced a vertex that was never added.
    #[error("vertex {0} does not exist")]
    UnknownVertex(NodeId),

    /// Self-loops carry no attractive force and are rejected outright.
    #[error("self-loop on vertex {0} is not supported")]
    SelfLoop(NodeId),
}

/// A plain 2D vector in frame coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// True iff both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// A graph vertex with unit mass.
///
/// `position` and `displacement` are owned by the layout engine once the
/// simulation starts; everything else is frozen at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the owning graph.
    pub id: NodeId,
    /// Current position in frame coordinates.
    pub position: Vec2,
    /// Force accumulator, reset at the start of every simulation step.
    pub displacement: Vec2,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            position: Vec2::ZERO,
            displacement: Vec2::ZERO,
        }
    }

    /// Clears the force accumulator for the next iteration.
    pub fn reset_displacement(&mut self) {
        self.displacement = Vec2::ZERO;
    }
}

/// An undirected edge between two distinct vertices.
///
/// Equality and hashing both go through [`Edge::canonical`], so `(u, v)`
/// and `(v, u)` are the same edge in any set or map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Canonical form: smaller id first.
    pub fn canonical(self) -> Edge {
        if self.source <= self.target {
            self
        } else {
            Edge::new(self.target, self.source)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        let a = self.canonical();
        let b = other.canonical();
        a.source == b.source && a.target == b.target
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let c = self.canonical();
        c.source.hash(state);
        c.target.hash(state);
    }
}

/// An undirected simple graph with stable node ordering.
///
/// Edges are kept in an insertion-ordered set so that iteration is
/// deterministic for a fixed construction sequence, which in turn keeps
/// whole layout runs reproducible under a fixed seed.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: IndexSet<Edge>,
    index: HashMap<NodeId, usize>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable view over all nodes in insertion order.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Canonical edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Neighbour ids of `id`.
    pub fn neighbours(&self, id: NodeId) -> GraphResult<&[NodeId]> {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(GraphError::UnknownVertex(id))
    }

    /// Position of `id` in the node sequence, if it exists.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node_by_id(&self, id: NodeId) -> GraphResult<&Node> {
        let idx = self.index_of(id).ok_or(GraphError::UnknownVertex(id))?;
        Ok(&self.nodes[idx])
    }

    pub fn node_by_id_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        let idx = self.index_of(id).ok_or(GraphError::UnknownVertex(id))?;
        Ok(&mut self.nodes[idx])
    }

    /// Adds a vertex with the given id.
    pub fn add_vertex(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        let idx = self.nodes.len();
        self.index.insert(id, idx);
        self.adjacency.insert(id, Vec::new());
        self.nodes.push(Node::new(id));
        Ok(&mut self.nodes[idx])
    }

    /// Adds an undirected edge. Both endpoints must already exist;
    /// inserting an edge twice (in either orientation) is a no-op.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> GraphResult<()> {
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        if !self.index.contains_key(&u) {
            return Err(GraphError::UnknownVertex(u));
        }
        if !self.index.contains_key(&v) {
            return Err(GraphError::UnknownVertex(v));
        }
        if self.edges.insert(Edge::new(u, v).canonical()) {
            // Freshly inserted: keep the adjacency lists symmetric.
            self.adjacency.entry(u).or_default().push(v);
            self.adjacency.entry(v).or_default().push(u);
        }
        Ok(())
    }

    /// Generates an Erdős–Rényi G(n, p) random graph.
    ///
    /// Vertices get ids `0..n`. Each unordered pair `(i, j)` with `i < j`
    /// is visited in ascending order and receives an edge with probability
    /// `p`, drawn from a ChaCha8 stream seeded with `seed` (or from OS
    /// entropy when `seed` is `None`).
    pub fn erdos_renyi(n: usize, p: f64, seed: Option<u64>) -> GraphResult<Graph> {
        if !(0.0..=1.0).contains(&p) {
            return Err(GraphError::InvalidProbability(p));
        }

        let mut g = Graph::new();
        for i in 0..n {
            g.add_vertex(i as NodeId)?;
        }

        let mut rng = seeded_rng(seed);
        let coin = Bernoulli::new(p).map_err(|_| GraphError::InvalidProbability(p))?;

        for i in 0..n {
            for j in (i + 1)..n {
                if coin.sample(&mut rng) {
                    g.add_edge(i as NodeId, j as NodeId)?;
                }
            }
        }
        Ok(g)
    }
}

/// Draws a deterministic ChaCha8 generator for the given optional seed.
///
/// Shared with the layout engine so both graph generation and position
/// scattering document the same PRNG algorithm.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Samples a uniform position inside `[0, w] × [0, h]`.
pub fn sample_position(rng: &mut impl Rng, w: f32, h: f32) -> Vec2 {
    let x = rng.gen_range(0.0..=w);
    let y = rng.gen_range(0.0..=h);
    Vec2::new(x, y)
}
