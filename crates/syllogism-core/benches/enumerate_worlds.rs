use criterion::{Criterion, black_box, criterion_group, criterion_main};
use syllogism_core::logic::{enumerate, evaluate_syllogism};
use syllogism_core::model::Syllogism;

fn enumerate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate_worlds");
    group.bench_function("all_64_syllogisms", |b| {
        b.iter(|| {
            for syllogism in Syllogism::all() {
                black_box(enumerate(syllogism));
            }
        })
    });
    for token in ["AA1", "EE1", "IO3"] {
        let syllogism: Syllogism = token.parse().expect("valid syllogism");
        group.bench_function(format!("evaluate_{token}"), |b| {
            b.iter(|| black_box(evaluate_syllogism(syllogism)))
        });
    }
    group.finish();
}

criterion_group!(benches, enumerate_all);
criterion_main!(benches);
