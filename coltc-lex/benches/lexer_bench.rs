use coltc_lex::Lexer;
use coltc_util::diagnostic::Sink;
use coltc_util::span::FileId;
use coltc_util::StringTable;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLE: &str = r#"
module example

public fn add(a: i32, b: i32) -> i32 {
    var sum = a + b;
    if sum == 0 {
        return 0;
    } elif sum < 0 {
        return -sum;
    } else {
        return sum;
    }
}

fn main() {
    let x: i32 = 41;
    let y = add(x, 1);
}
"#;

fn lex_sample(c: &mut Criterion) {
    c.bench_function("lex_sample_module", |b| {
        b.iter(|| {
            let mut strings = StringTable::new();
            let mut sink = Sink;
            let lexer = Lexer::new(black_box(SAMPLE), &mut strings, &mut sink, FileId::new(0));
            black_box(lexer.lex())
        })
    });
}

criterion_group!(benches, lex_sample);
criterion_main!(benches);
