//! Compile and evaluate costs of conversion formulas

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use senreg_core::{DataType, Unit};

const DBFS: &str = "(20 * log10(abs(v)+1)) / 32767";

fn compile(c: &mut Criterion) {
    c.bench_function("compile_dbfs", |b| {
        b.iter(|| Unit::new(black_box(DBFS), DataType::Int16))
    });
}

fn evaluate(c: &mut Criterion) {
    let scale = Unit::new("v / 10", DataType::Int16).expect("formula compiles");
    let dbfs = Unit::new(DBFS, DataType::Int16).expect("formula compiles");

    c.bench_function("convert_scale", |b| b.iter(|| scale.convert(black_box(215i16))));
    c.bench_function("convert_dbfs", |b| b.iter(|| dbfs.convert(black_box(12345i16))));
    c.bench_function("convert_to_string_dbfs", |b| {
        b.iter(|| dbfs.convert_to_string(black_box(12345i16)))
    });
}

criterion_group!(benches, compile, evaluate);
criterion_main!(benches);
