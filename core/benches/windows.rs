use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vchrom_core::{pixels, reverse, windows, RegionTable, VirtualIndex};

fn generate_exon_table(count: u64) -> RegionTable {
    // Exon-sized spans separated by intron-sized gaps on one chromosome
    RegionTable::from_triples((0..count).map(|i| {
        let start = i * 2_000;
        ("chr1", start, start + 150 + (i % 7) * 40)
    }))
    .expect("generated regions are valid")
}

fn bench_index_build(c: &mut Criterion) {
    let table = generate_exon_table(50_000);

    c.bench_function("index_build_50k", |b| {
        b.iter(|| {
            let index = VirtualIndex::build(black_box(table.clone()));
            black_box(index)
        })
    });
}

fn bench_make_windows(c: &mut Criterion) {
    let index = VirtualIndex::build(generate_exon_table(50_000)).expect("non-empty table");
    let mid = index.virtual_length() / 2;

    c.bench_function("make_windows_100", |b| {
        b.iter(|| {
            let result = windows::make_windows(&index, black_box(mid), black_box(mid + 25_000));
            black_box(result)
        })
    });

    c.bench_function("make_windows_and_allocate_100", |b| {
        b.iter(|| {
            let windows = windows::make_windows(&index, mid, mid + 25_000).expect("valid range");
            black_box(pixels::allocate(windows, black_box(1_200), 0))
        })
    });
}

fn bench_reverse_lookup(c: &mut Criterion) {
    let index = VirtualIndex::build(generate_exon_table(50_000)).expect("non-empty table");

    c.bench_function("find_overlaps_linear_50k", |b| {
        b.iter(|| {
            let matches = reverse::locate_real(
                &index,
                "chr1",
                black_box(50_000_000),
                black_box(50_100_000),
                true,
            );
            black_box(matches)
        })
    });
}

criterion_group!(benches, bench_index_build, bench_make_windows, bench_reverse_lookup);
criterion_main!(benches);
