//! Parser benchmarks.
//!
//! Run with `cargo bench --package coltc-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use coltc_lex::Lexer;
use coltc_par::{AstBuilder, ModuleTable, TypeBuffer};
use coltc_util::diagnostic::Sink;
use coltc_util::span::FileId;
use coltc_util::StringTable;

fn parse_source(source: &str) {
    let mut strings = StringTable::new();
    let mut sink = Sink;
    let tokens = Lexer::new(source, &mut strings, &mut sink, FileId::new(0)).lex();
    let mut types = TypeBuffer::new();
    let root_name = strings.intern("root");
    let mut modules = ModuleTable::new(root_name);
    let mut builder = AstBuilder::new(&tokens, &mut strings, &mut types, &mut modules, &mut sink);
    builder.parse_program();
}

fn bench_declarations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_declarations");

    let source = "let x: i32 = 42;";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("single_declaration", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_constant_folding(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_constant_folding");

    let source = "let x: i32 = 2 + 3 * 4 - 5 / 1 + 6 * 7 - 8 + 9 * 10;";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("arithmetic_chain", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_nested_scopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_nested_scopes");

    let source = r#"
        {
            let a = 1;
            {
                let b = 2;
                {
                    let c = a + b;
                }
            }
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("three_deep", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_conditionals(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_conditionals");

    let source = r#"
        let n: i32 = 5;
        if (n < 0) {
            let r: i32 = 0 - 1;
        } elif (n == 0) {
            let r: i32 = 0;
        } else {
            let r: i32 = 1;
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("if_elif_else", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_pointer_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_pointers");

    let source = r#"
        let q: i32 = 1;
        let p: ptr.i32 = &q;
        *p;
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("address_of_and_deref", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_declarations,
    bench_constant_folding,
    bench_nested_scopes,
    bench_conditionals,
    bench_pointer_heavy
);
criterion_main!(benches);
