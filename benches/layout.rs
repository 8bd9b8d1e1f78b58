//! Benchmarks for the layout engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use topovis_rs::layout::LayoutEngine;
use topovis_rs::model::{
    PhysicalSource, ProcessingNode, Sink, Topology, TypedConfig,
};

/// Chain of `size` processing nodes, each carrying one source and one
/// sink, linked downstream in a line.
fn chain_topology(size: usize) -> Topology {
    let mut topology = Topology::default();
    for i in 0..size {
        let mut node = ProcessingNode::new(
            format!("node{}:9100", i),
            format!("node{}:9101", i),
            8,
        );
        if i + 1 < size {
            node.links.downstreams.push(format!("node{}:9100", i + 1));
        }
        node.physical = Some(vec![PhysicalSource {
            logical: "events".to_string(),
            parser_config: TypedConfig::new("JSON"),
            source_config: TypedConfig::new("Socket"),
        }]);
        node.sinks = Some(vec![Sink {
            name: format!("sink{}", i),
            kind: "Print".to_string(),
            config: Default::default(),
        }]);
        topology.nodes.push(node);
    }
    topology
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_graph_rebuild");
    for size in [10, 50, 200] {
        let topology = chain_topology(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &topology, |b, t| {
            let mut engine = LayoutEngine::new(t);
            b.iter(|| {
                engine.rebuild(black_box(t));
            });
        });
    }
    group.finish();
}

fn bench_relax(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_relax");
    for size in [10, 50] {
        let topology = chain_topology(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &topology, |b, t| {
            b.iter(|| {
                let mut engine = LayoutEngine::new(black_box(t));
                engine.relax();
            });
        });
    }
    group.finish();
}

fn bench_single_step(c: &mut Criterion) {
    let topology = chain_topology(100);
    c.bench_function("layout_step_100_nodes", |b| {
        let mut engine = LayoutEngine::new(&topology);
        b.iter(|| {
            engine.reheat();
            engine.step();
        });
    });
}

criterion_group!(benches, bench_rebuild, bench_relax, bench_single_step);
criterion_main!(benches);
