//! # Property-Based Tests
//!
//! Traversal and placement invariants checked with proptest over layered
//! feed-forward graphs: sources in the first layer, sinks in the last, and
//! every edge joining two consecutive layers.

use cassette_core::{Bfs, Graph, GraphBuilder, NodeType, Placement, VertexId, VertexRole};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// GENERATORS
// =============================================================================

/// Build a layered graph from layer widths and a pool of choice seeds.
///
/// Every vertex outside the last layer drives at least one vertex of the
/// next layer, and every vertex outside the first layer is driven by at
/// least one vertex of the previous layer.
fn layered_graph(widths: &[usize], seeds: &[usize]) -> Graph {
    let mut builder = GraphBuilder::new("layered");
    let mut seed = seeds.iter().cycle();
    let mut next_seed = || seed.next().copied().unwrap_or(0);

    let last = widths.len() - 1;
    let layers: Vec<Vec<VertexId>> = widths
        .iter()
        .enumerate()
        .map(|(l, &width)| {
            (0..width)
                .map(|i| {
                    let (role, node_type) = if l == 0 {
                        (VertexRole::Source, NodeType::PrimaryInput)
                    } else if l == last {
                        (VertexRole::Sink, NodeType::PrimaryOutput)
                    } else {
                        (VertexRole::Inner, NodeType::parse("NOR"))
                    };
                    builder.add_vertex(format!("v{l}_{i}"), role, node_type, "")
                })
                .collect()
        })
        .collect();

    for l in 0..last {
        let (here, next) = (&layers[l], &layers[l + 1]);
        let mut targets: Vec<BTreeSet<usize>> = here
            .iter()
            .map(|_| BTreeSet::from([next_seed() % next.len()]))
            .collect();
        for m in 0..next.len() {
            targets[next_seed() % here.len()].insert(m);
        }
        for (j, dst) in targets.into_iter().enumerate() {
            builder.add_edge(
                format!("e{l}_{j}"),
                here[j],
                dst.into_iter().map(|m| next[m]).collect(),
            );
        }
    }

    builder.build().expect("build")
}

fn positions(order: &[VertexId]) -> BTreeMap<VertexId, usize> {
    order.iter().enumerate().map(|(i, v)| (*v, i)).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Forward BFS reports every reachable vertex exactly once.
    #[test]
    fn forward_visits_each_vertex_once(
        widths in vec(1usize..4, 2..6),
        seeds in vec(0usize..1000, 1..32),
    ) {
        let graph = layered_graph(&widths, &seeds);
        let order: Vec<_> = Bfs::forward(&graph).collect();
        let distinct: BTreeSet<_> = order.iter().copied().collect();

        prop_assert_eq!(order.len(), distinct.len());
        prop_assert_eq!(order.len(), graph.vertex_count());
    }

    /// Sink-rooted BFS lists every edge's destination before its source.
    #[test]
    fn sink_rooted_is_reverse_topological(
        widths in vec(1usize..4, 2..6),
        seeds in vec(0usize..1000, 1..32),
    ) {
        let graph = layered_graph(&widths, &seeds);
        let order: Vec<_> = Bfs::sink_rooted(&graph).collect();
        prop_assert_eq!(order.len(), graph.vertex_count());

        let at = positions(&order);
        for (_, edge) in graph.edges() {
            for dst in edge.dst() {
                prop_assert!(at[dst] < at[&edge.src()]);
            }
        }
    }

    /// Two traversals of the same graph agree.
    #[test]
    fn traversal_is_deterministic(
        widths in vec(1usize..4, 2..6),
        seeds in vec(0usize..1000, 1..32),
    ) {
        let graph = layered_graph(&widths, &seeds);
        let first: Vec<_> = Bfs::sink_rooted(&graph).collect();
        let second: Vec<_> = Bfs::sink_rooted(&graph).collect();
        prop_assert_eq!(first, second);
    }

    /// A rotated, possibly reversed device still matches the device.
    #[test]
    fn placement_matches_any_arrangement(
        device in vec("[a-d]{1,2}", 1..8),
        shift in 0usize..8,
        reverse in any::<bool>(),
    ) {
        let mut parts = device.clone();
        parts.rotate_left(shift % device.len());
        let mut placement = Placement::new(parts, 0);
        if reverse {
            placement.reverse();
        }
        prop_assert!(placement.matches_device(&device));
        prop_assert_eq!(placement.direction, !reverse);

        placement.parts.push("extra".to_string());
        prop_assert!(!placement.matches_device(&device));
    }
}
