use criterion::{Criterion, black_box, criterion_group, criterion_main};
use vdom::{EventHandler, VNode, diff, diff_from_empty};

const SMALL_ROWS: usize = 64;
const LARGE_ROWS: usize = 10_000;

#[derive(Clone)]
enum Action {
    Select(usize),
}

fn make_rows(rows: usize, generation: usize) -> VNode<Action> {
    let list = (0..rows).map(|i| {
        VNode::new("Stack")
            .property("orientation", "horizontal")
            .property("spacing", 4)
            .child(VNode::new("Label").property("text", format!("row {i} gen {}", generation % 3)))
            .child(
                VNode::new("Button")
                    .property("text", "select")
                    .on("action", EventHandler::emit(Action::Select(i))),
            )
    });
    VNode::new("Pane")
        .property("width", 800)
        .property("height", 600)
        .child(VNode::new("Stack").children_from(list))
}

fn bench_diff_identical_large(c: &mut Criterion) {
    let tree = make_rows(LARGE_ROWS, 0);
    let copy = tree.clone();
    c.bench_function("bench_diff_identical_large", |b| {
        b.iter(|| {
            let patches = diff(Some(black_box(&tree)), black_box(&copy));
            black_box(patches.len());
        });
    });
}

fn bench_diff_rerender_small(c: &mut Criterion) {
    let prev = make_rows(SMALL_ROWS, 0);
    let next = make_rows(SMALL_ROWS, 1);
    c.bench_function("bench_diff_rerender_small", |b| {
        b.iter(|| {
            let patches = diff(Some(black_box(&prev)), black_box(&next));
            black_box(patches.len());
        });
    });
}

fn bench_diff_rerender_large(c: &mut Criterion) {
    let prev = make_rows(LARGE_ROWS, 0);
    let next = make_rows(LARGE_ROWS, 1);
    c.bench_function("bench_diff_rerender_large", |b| {
        b.iter(|| {
            let patches = diff(Some(black_box(&prev)), black_box(&next));
            black_box(patches.len());
        });
    });
}

fn bench_diff_shrink_large(c: &mut Criterion) {
    let prev = make_rows(LARGE_ROWS, 0);
    let next = make_rows(LARGE_ROWS / 2, 0);
    c.bench_function("bench_diff_shrink_large", |b| {
        b.iter(|| {
            let patches = diff(Some(black_box(&prev)), black_box(&next));
            black_box(patches.len());
        });
    });
}

fn bench_first_render_large(c: &mut Criterion) {
    let tree = make_rows(LARGE_ROWS, 0);
    c.bench_function("bench_first_render_large", |b| {
        b.iter(|| {
            let patches = diff_from_empty(black_box(&tree));
            black_box(patches.len());
        });
    });
}

criterion_group!(
    benches,
    bench_diff_identical_large,
    bench_diff_rerender_small,
    bench_diff_rerender_large,
    bench_diff_shrink_large,
    bench_first_render_large
);
criterion_main!(benches);
