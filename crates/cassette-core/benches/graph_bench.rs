//! # Graph Benchmarks
//!
//! Performance benchmarks for cassette-core traversal and script synthesis.
//!
//! Run with: `cargo bench -p cassette-core`

use cassette_core::library::{
    Gate, InputSensor, LibraryDocument, OutputReporter, Part, ResponseFunction, ResponseVariable,
};
use cassette_core::{
    AssemblyPlanner, Bfs, Graph, GraphBuilder, Library, NodeType, VertexRole, graph_to_json,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

/// Create a chain: one input, N inverters, one output.
fn create_linear_graph(size: usize) -> Graph {
    let mut builder = GraphBuilder::new("linear");
    let mut prev = builder.add_vertex("in", VertexRole::Source, NodeType::PrimaryInput, "pIn");
    for i in 0..size {
        let gate = builder.add_vertex(
            format!("g{i}"),
            VertexRole::Inner,
            NodeType::parse("NOT"),
            format!("G{i}"),
        );
        builder.add_edge(format!("w{i}"), prev, vec![gate]);
        prev = gate;
    }
    let out = builder.add_vertex("out", VertexRole::Sink, NodeType::PrimaryOutput, "reporter");
    builder.add_edge("w_out", prev, vec![out]);
    builder.build().expect("build")
}

/// Create a star: one input driving N outputs through a single hyperedge.
fn create_star_graph(size: usize) -> Graph {
    let mut builder = GraphBuilder::new("star");
    let hub = builder.add_vertex("hub", VertexRole::Source, NodeType::PrimaryInput, "pIn");
    let spokes = (0..size)
        .map(|i| {
            builder.add_vertex(
                format!("y{i}"),
                VertexRole::Sink,
                NodeType::PrimaryOutput,
                "reporter",
            )
        })
        .collect();
    builder.add_edge("fan", hub, spokes);
    builder.build().expect("build")
}

/// A library with one distinct gate per chain position.
fn create_library(size: usize) -> Library {
    let mut parts = vec![
        Part::new("pIn", "promoter", "AACGATCG"),
        Part::new("rbs", "rbs", "AGGAGG"),
        Part::new("term", "terminator", "CCCGCC"),
        Part::new("YFP", "cds", "ATGGTG"),
    ];
    let mut gates = Vec::with_capacity(size);
    for i in 0..size {
        parts.push(Part::new(format!("p{i}"), "promoter", "GATTCG"));
        parts.push(Part::new(format!("cds{i}"), "cds", "ATGGCA"));
        gates.push(Gate {
            name: format!("G{i}"),
            regulator: format!("R{i}"),
            gate_type: "NOT".to_string(),
            promoter: format!("p{i}"),
            cassette: BTreeMap::from([(
                "x".to_string(),
                vec!["rbs".to_string(), format!("cds{i}"), "term".to_string()],
            )]),
            response_function: ResponseFunction {
                equation: "x".to_string(),
                variables: vec![ResponseVariable {
                    name: "x".to_string(),
                    off_threshold: None,
                    on_threshold: None,
                }],
                parameters: BTreeMap::new(),
            },
        });
    }
    Library::from_document(LibraryDocument {
        parts,
        gates,
        input_sensors: vec![InputSensor {
            name: "pIn".to_string(),
            parts: vec!["pIn".to_string()],
        }],
        output_reporters: vec![OutputReporter {
            name: "reporter".to_string(),
            parts: vec!["YFP".to_string()],
        }],
        ..LibraryDocument::default()
    })
    .expect("library")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_linear_graph(size)));
        });
    }

    group.finish();
}

fn bench_bfs(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfs");

    for size in [100, 1000, 10000].iter() {
        let linear = create_linear_graph(*size);
        let star = create_star_graph(*size);

        group.bench_with_input(BenchmarkId::new("forward_linear", size), &linear, |b, g| {
            b.iter(|| black_box(Bfs::forward(g).count()));
        });
        group.bench_with_input(BenchmarkId::new("sink_rooted_linear", size), &linear, |b, g| {
            b.iter(|| black_box(Bfs::sink_rooted(g).count()));
        });
        group.bench_with_input(BenchmarkId::new("sink_rooted_star", size), &star, |b, g| {
            b.iter(|| black_box(Bfs::sink_rooted(g).count()));
        });
    }

    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");

    for size in [10, 50, 200].iter() {
        let library = create_library(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut graph = create_linear_graph(size);
                let synthesized = AssemblyPlanner::new(&library)
                    .collect(&mut graph)
                    .expect("collect")
                    .synthesize(&graph)
                    .expect("synthesize");
                black_box(synthesized.script().text().len())
            });
        });
    }

    group.finish();
}

fn bench_netlist_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("netlist_json");

    for size in [100, 1000].iter() {
        let graph = create_linear_graph(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(graph_to_json(&graph)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_graph_build,
    bench_bfs,
    bench_synthesize,
    bench_netlist_json,
);
criterion_main!(benches);
