use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use recipe_impact::processing::{resolve, FoodClassMatcher};
use recipe_impact::types::FoodClassNode;

/// A forest of `roots` chains, each `depth` deep, with only the root valued.
fn deep_forest(roots: i64, depth: i64) -> Vec<FoodClassNode> {
    let mut nodes = Vec::with_capacity((roots * depth) as usize);
    for r in 0..roots {
        let base = r * depth;
        nodes.push(FoodClassNode::new(base, format!("root {r}"), Some(1.0 + r as f64), None));
        for d in 1..depth {
            nodes.push(FoodClassNode::new(
                base + d,
                format!("class {r} level {d}"),
                None,
                Some(base + d - 1),
            ));
        }
    }
    // Leaves first, so the first walk of each chain is the longest.
    nodes.reverse();
    nodes
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for depth in [4_i64, 64, 512] {
        let nodes = deep_forest(100, depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &nodes, |b, nodes| {
            b.iter(|| resolve(black_box(nodes)))
        });
    }
    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let nodes = deep_forest(50, 40);
    let matcher = FoodClassMatcher::from_nodes(&nodes);
    c.bench_function("match_2000_candidates", |b| {
        b.iter(|| {
            black_box(matcher.find("Class 49 Level 39"));
            black_box(matcher.find("unknown ingredient"));
        })
    });
}

criterion_group!(benches, bench_resolve, bench_match);
criterion_main!(benches);
