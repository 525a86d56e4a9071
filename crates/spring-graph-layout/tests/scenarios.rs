//! End-to-end simulation scenarios for the layout engine.

use spring_graph_core::Graph;
use spring_graph_layout::{BarnesHut, BruteForce, LayoutEngine};

fn distance(g: &Graph, a: u32, b: u32) -> f32 {
    let pa = g.node_by_id(a).unwrap().position;
    let pb = g.node_by_id(b).unwrap().position;
    (pa - pb).length()
}

/// Two connected nodes settle near the optimal distance k.
#[test]
fn two_node_chain_finds_its_rest_length() {
    let mut g = Graph::new();
    g.add_vertex(0).unwrap();
    g.add_vertex(1).unwrap();
    g.add_edge(0, 1).unwrap();

    let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
    engine.initialize(&mut g, Some(7)).unwrap();
    engine.set_temperature(10.0);
    engine.set_cooling_rate(0.95);

    for _ in 0..500 {
        engine.step(&mut g).unwrap();
    }

    let k = engine.optimal_distance();
    assert!((k - (10_000.0f32 / 2.0).sqrt()).abs() < 1e-3);

    let d = distance(&g, 0, 1);
    assert!(
        d >= 0.5 * k && d <= 1.5 * k,
        "rest length {d} outside [{}, {}]",
        0.5 * k,
        1.5 * k
    );
}

/// With no edges the nodes drift apart under pure repulsion, stay inside
/// the frame, and the motion dies down as the temperature bottoms out.
#[test]
fn pure_repulsion_cools_to_rest() {
    let mut g = Graph::erdos_renyi(10, 0.0, Some(42)).unwrap();
    assert_eq!(g.edge_count(), 0);

    let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
    engine.initialize(&mut g, Some(11)).unwrap();
    engine.set_temperature(10.0);

    let mut first_energy = None;
    for _ in 0..300 {
        engine.step(&mut g).unwrap();
        first_energy.get_or_insert(engine.kinetic_energy());
        for v in g.nodes() {
            assert!(v.position.x >= 0.0 && v.position.x <= 100.0);
            assert!(v.position.y >= 0.0 && v.position.y <= 100.0);
        }
    }

    let final_energy = engine.kinetic_energy();
    assert!(final_energy < first_energy.unwrap());
    // At the temperature floor each node can move at most 1e-3 per step.
    assert!(final_energy <= 10.0 * 1e-3 + 1e-6, "energy {final_energy}");
}

/// Barnes-Hut with theta = 0 tracks the brute-force reference through an
/// entire run: per-node position difference stays within 1e-2 at every
/// step.
#[test]
fn barnes_hut_theta_zero_tracks_brute_force() {
    let mut exact = Graph::erdos_renyi(50, 0.15, Some(42)).unwrap();
    let mut approx = exact.clone();

    let mut bf_engine = LayoutEngine::new(1000.0, 1000.0, 1.0).unwrap();
    let mut bh_engine = LayoutEngine::new(1000.0, 1000.0, 1.0).unwrap();
    bh_engine.set_repulsive_strategy(Box::new(BarnesHut::new(0.0)));

    bf_engine.initialize(&mut exact, Some(7)).unwrap();
    bh_engine.initialize(&mut approx, Some(7)).unwrap();

    for step in 0..200 {
        bf_engine.step(&mut exact).unwrap();
        bh_engine.step(&mut approx).unwrap();

        let mut worst = 0.0f32;
        for (a, b) in exact.nodes().iter().zip(approx.nodes()) {
            worst = worst
                .max((a.position.x - b.position.x).abs())
                .max((a.position.y - b.position.y).abs());
        }
        assert!(worst <= 1e-2, "step {step}: L-inf divergence {worst}");
    }
}

/// Two coincident nodes separate in one step, moving in opposite
/// directions by at most the temperature.
#[test]
fn coincident_nodes_separate_in_one_step() {
    let mut g = Graph::new();
    g.add_vertex(0).unwrap();
    g.add_vertex(1).unwrap();
    for v in g.nodes_mut() {
        v.position = spring_graph_core::Vec2::new(50.0, 50.0);
    }

    let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
    engine.set_temperature(1.0);
    engine.step(&mut g).unwrap();

    let p0 = g.node_by_id(0).unwrap().position;
    let p1 = g.node_by_id(1).unwrap().position;
    assert!(p0.is_finite() && p1.is_finite());
    assert!(distance(&g, 0, 1) > 0.0, "nodes are still coincident");

    // The epsilon guard pushes node 0 east and node 1 west, each clamped
    // to the temperature.
    assert!(p0.x > 50.0 && p1.x < 50.0);
    assert!((p0.x - 50.0) <= 1.0 + 1e-6);
    assert!((50.0 - p1.x) <= 1.0 + 1e-6);

    // Both displacements were far above the temperature, so the recorded
    // kinetic energy is exactly two full temperature clamps.
    assert!((engine.kinetic_energy() - 2.0).abs() < 1e-5);
}

/// Fixed seeds make whole runs bit-identical, including the convergence
/// curve.
#[test]
fn runs_are_reproducible_for_fixed_seeds() {
    let run = || {
        let mut g = Graph::erdos_renyi(30, 0.2, Some(42)).unwrap();
        let mut engine = LayoutEngine::new(800.0, 600.0, 1.0).unwrap();
        engine.set_repulsive_strategy(Box::new(BarnesHut::new(0.5)));
        engine.initialize(&mut g, Some(7)).unwrap();
        engine.set_temperature(50.0);

        let mut curve = Vec::new();
        for _ in 0..100 {
            engine.step(&mut g).unwrap();
            curve.push(engine.kinetic_energy());
        }
        let positions: Vec<(u32, u32)> = g
            .nodes()
            .iter()
            .map(|v| (v.position.x.to_bits(), v.position.y.to_bits()))
            .collect();
        (positions, curve)
    };

    let (pos_a, curve_a) = run();
    let (pos_b, curve_b) = run();
    assert_eq!(pos_a, pos_b);
    let bits_a: Vec<u32> = curve_a.iter().map(|e| e.to_bits()).collect();
    let bits_b: Vec<u32> = curve_b.iter().map(|e| e.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

/// On a connected graph the layout cools: the trailing average of the
/// kinetic energy ends up well below its starting value.
#[test]
fn connected_graph_layout_cools() {
    let mut g = Graph::new();
    for i in 0..10 {
        g.add_vertex(i).unwrap();
    }
    for i in 0..10 {
        g.add_edge(i, (i + 1) % 10).unwrap();
    }

    let mut engine = LayoutEngine::new(100.0, 100.0, 1.0).unwrap();
    engine.initialize(&mut g, Some(13)).unwrap();
    engine.set_temperature(10.0);

    let mut curve = Vec::new();
    for _ in 0..300 {
        engine.step(&mut g).unwrap();
        curve.push(engine.kinetic_energy());
    }

    let initial = curve[0];
    let tail = &curve[curve.len() - 50..];
    let tail_avg: f32 = tail.iter().sum::<f32>() / tail.len() as f32;
    assert!(
        tail_avg < initial,
        "trailing average {tail_avg} did not drop below {initial}"
    );
}

/// Swapping strategies mid-run keeps stepping without disturbing the
/// engine's observable state.
#[test]
fn strategy_can_be_swapped_at_runtime() {
    let mut g = Graph::erdos_renyi(20, 0.2, Some(5)).unwrap();
    let mut engine = LayoutEngine::new(400.0, 400.0, 1.0).unwrap();
    engine.initialize(&mut g, Some(5)).unwrap();

    for _ in 0..10 {
        engine.step(&mut g).unwrap();
    }
    let k_before = engine.optimal_distance();

    engine.set_repulsive_strategy(Box::new(BarnesHut::new(0.5)));
    for _ in 0..10 {
        engine.step(&mut g).unwrap();
    }
    assert_eq!(engine.optimal_distance(), k_before);

    engine.set_repulsive_strategy(Box::new(BruteForce));
    for _ in 0..10 {
        engine.step(&mut g).unwrap();
    }
    for v in g.nodes() {
        assert!(v.position.is_finite());
    }
}
