use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use minefield_core::{MineLayout, MinefieldEngine};

/// Worst case for the flood fill: an empty minefield, so a corner reveal
/// opens the entire board.
fn bench_full_board_flood(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_reveal");
    for side in [16u8, 64, 192] {
        let layout = MineLayout::from_mine_coords(side, &[]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(side), &layout, |b, layout| {
            b.iter_batched(
                || MinefieldEngine::from_layout(layout.clone(), 0),
                |mut engine| engine.reveal((0, 0)).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_board_flood);
criterion_main!(benches);
