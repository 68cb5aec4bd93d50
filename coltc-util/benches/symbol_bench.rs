use criterion::{black_box, criterion_group, criterion_main, Criterion};

use coltc_util::symbol::StringTable;

fn bench_intern(c: &mut Criterion) {
    c.bench_function("intern_unique", |b| {
        b.iter(|| {
            let mut table = StringTable::new();
            for i in 0..1000 {
                black_box(table.intern(&format!("ident_{i}")));
            }
        })
    });

    c.bench_function("intern_repeated", |b| {
        let mut table = StringTable::new();
        b.iter(|| {
            for _ in 0..1000 {
                black_box(table.intern("same_ident"));
            }
        })
    });
}

criterion_group!(benches, bench_intern);
criterion_main!(benches);
