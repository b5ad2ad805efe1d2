use circle_pack_renderer::hierarchy::build;
use circle_pack_renderer::layout::{PackOptions, pack};
use circle_pack_renderer::parser::parse_records;
use circle_pack_renderer::render::render_svg;
use circle_pack_renderer::{RenderOptions, render_with_options};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const FLARE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/flare.csv"
));

/// A balanced tree with `fanout` children per group, `depth` levels deep, and
/// leaf values spread over three orders of magnitude.
fn synthetic_csv(fanout: usize, depth: usize) -> String {
    let mut out = String::from("id,value\nroot,\n");
    let mut frontier = vec!["root".to_string()];
    let mut seed: u64 = 7;
    for level in 1..=depth {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for parent in &frontier {
            for i in 0..fanout {
                let id = format!("{parent}.N{i}");
                if level == depth {
                    seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let value = 1 + (seed >> 33) % 5000;
                    out.push_str(&format!("{id},{value}\n"));
                } else {
                    out.push_str(&format!("{id},\n"));
                    next.push(id);
                }
            }
        }
        frontier = next;
    }
    out
}

fn inputs() -> Vec<(&'static str, String)> {
    vec![
        ("flare", FLARE.to_string()),
        ("wide_2x40", synthetic_csv(40, 2)),
        ("deep_6x4", synthetic_csv(4, 6)),
        ("large_3x12", synthetic_csv(12, 3)),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, input) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| parse_records(black_box(data)).expect("parse failed"));
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for (name, input) in inputs() {
        let records = parse_records(&input).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &records, |b, data| {
            b.iter(|| build(black_box(data)).expect("build failed"));
        });
    }
    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    let options = PackOptions::new(960.0, 960.0, 3.0);
    for (name, input) in inputs() {
        let records = parse_records(&input).expect("parse failed");
        let tree = build(&records).expect("build failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, data| {
            b.iter(|| {
                let mut tree = data.clone();
                pack(black_box(&mut tree), &options).expect("pack failed");
                tree
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = RenderOptions::default();
    for (name, input) in inputs() {
        let records = parse_records(&input).expect("parse failed");
        let mut tree = build(&records).expect("build failed");
        pack(&mut tree, &options.pack_options()).expect("pack failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, data| {
            b.iter(|| {
                render_svg(
                    black_box(data),
                    &options.theme,
                    &options.layout,
                    &options.render,
                )
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for (name, input) in inputs() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                render_with_options(black_box(data), RenderOptions::default())
                    .expect("render failed")
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_build,
    bench_pack,
    bench_render,
    bench_end_to_end
);
criterion_main!(benches);
