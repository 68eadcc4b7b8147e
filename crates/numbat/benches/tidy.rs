use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use numbat::{Hierarchy, Sizing, TreeLayout, layout};
use std::hint::black_box;

fn build(fanout: usize, depth: usize) -> Hierarchy {
    let mut h = Hierarchy::new();
    let mut frontier = vec![h.root()];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for n in frontier {
            for _ in 0..fanout {
                next.push(h.add_child(n));
            }
        }
        frontier = next;
    }
    h
}

fn bench_tidy(c: &mut Criterion) {
    let options = TreeLayout {
        sizing: Sizing::Fit {
            width: 1240.0,
            height: 700.0,
        },
        ..Default::default()
    };

    let mut group = c.benchmark_group("tidy_tree");
    for (fanout, depth) in [(2, 10), (3, 7), (8, 4)] {
        let h = build(fanout, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{fanout}x{depth}")),
            &h,
            |b, h| b.iter(|| layout(black_box(h), black_box(&options))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tidy);
criterion_main!(benches);
