//! Benchmarks for syntax highlighting: full rebuild vs incremental refresh.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use codetab::highlight::{DocumentHighlighter, LineEdit};

fn sample_source(functions: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..functions {
        lines.push(format!("/* helper number {i} */"));
        lines.push("#[inline]".to_string());
        lines.push(format!("fn helper_{i}(value: i32) -> Result {{"));
        lines.push(format!("    let text = \"value {i}\"; // trailing note"));
        lines.push(format!("    return value * {i} + 0x1F;"));
        lines.push("}".to_string());
        lines.push(String::new());
    }
    lines
}

fn bench_full_rebuild(c: &mut Criterion) {
    let lines = sample_source(1_000);
    c.bench_function("highlight_full_rebuild", |b| {
        b.iter(|| {
            let mut highlighter = DocumentHighlighter::new(true);
            highlighter.rebuild(black_box(lines.as_slice()));
            highlighter
        });
    });
}

fn bench_incremental_line_edit(c: &mut Criterion) {
    let mut lines = sample_source(1_000);
    let mut highlighter = DocumentHighlighter::new(true);
    highlighter.rebuild(lines.as_slice());
    let target = lines.len() / 2;
    lines[target].push_str(" let extra = 1;");
    let edit = LineEdit {
        start: target,
        removed: 1,
        inserted: 1,
    };

    c.bench_function("highlight_incremental_line_edit", |b| {
        b.iter_batched(
            || highlighter.clone(),
            |mut hl| {
                hl.refresh(black_box(lines.as_slice()), edit);
                hl
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_incremental_comment_open(c: &mut Criterion) {
    let mut lines = sample_source(1_000);
    let mut highlighter = DocumentHighlighter::new(true);
    highlighter.rebuild(lines.as_slice());
    // Opening a block comment changes the state of every following line.
    let target = lines.len() / 2;
    lines[target].push_str(" /*");
    let edit = LineEdit {
        start: target,
        removed: 1,
        inserted: 1,
    };

    c.bench_function("highlight_incremental_comment_open", |b| {
        b.iter_batched(
            || highlighter.clone(),
            |mut hl| {
                hl.refresh(black_box(lines.as_slice()), edit);
                hl
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_full_rebuild,
    bench_incremental_line_edit,
    bench_incremental_comment_open
);
criterion_main!(benches);
