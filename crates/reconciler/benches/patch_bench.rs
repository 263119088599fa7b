use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use reconciler::{Dispatcher, Renderer};
use vdom::{EventHandler, VNode};

const SMALL_ROWS: usize = 64;
const LARGE_ROWS: usize = 2_000;

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
                    .property("disabled", generation % 2 == 1 && i % 7 == 0)
                    .on("action", EventHandler::emit(Action::Select(i))),
            )
    });
    VNode::new("Pane")
        .property("width", 800)
        .property("height", 600)
        .child(VNode::new("Stack").children_from(list))
}

fn renderer() -> Renderer<Action> {
    Renderer::new(memory_toolkit::registry(), Dispatcher::discard())
}

fn bench_build_large(c: &mut Criterion) {
    let tree = make_rows(LARGE_ROWS, 0);
    c.bench_function("bench_build_large", |b| {
        b.iter_batched(
            || (renderer(), tree.clone()),
            |(mut renderer, tree)| {
                let stats = renderer.render(black_box(tree)).ok();
                black_box(stats);
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_patch_rerender(c: &mut Criterion, name: &str, rows: usize) {
    let trees = [make_rows(rows, 0), make_rows(rows, 1)];
    let mut live = renderer();
    let _ = live.render(trees[0].clone());
    let mut generation = 0usize;
    c.bench_function(name, |b| {
        b.iter(|| {
            generation += 1;
            let next = trees[generation % 2].clone();
            let stats = live.render(black_box(next)).ok();
            black_box(stats);
        });
    });
}

fn bench_patch_rerender_small(c: &mut Criterion) {
    bench_patch_rerender(c, "bench_patch_rerender_small", SMALL_ROWS);
}

fn bench_patch_rerender_large(c: &mut Criterion) {
    bench_patch_rerender(c, "bench_patch_rerender_large", LARGE_ROWS);
}

fn bench_patch_shrink_large(c: &mut Criterion) {
    let full = make_rows(LARGE_ROWS, 0);
    let half = make_rows(LARGE_ROWS / 2, 0);
    c.bench_function("bench_patch_shrink_large", |b| {
        b.iter_batched(
            || {
                let mut live = renderer();
                let _ = live.render(full.clone());
                (live, half.clone())
            },
            |(mut live, half)| {
                let stats = live.render(black_box(half)).ok();
                black_box(stats);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build_large,
    bench_patch_rerender_small,
    bench_patch_rerender_large,
    bench_patch_shrink_large
);
criterion_main!(benches);
