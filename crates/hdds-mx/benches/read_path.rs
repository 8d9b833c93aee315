// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read Path Benchmark
//!
//! Measures the per-request cost of the management surface:
//! - CompositeDataWriter::apply() on a flat and a nested struct
//! - TabularDataWriter::apply() for growing row counts
//! - ManagedInterface::attribute() and invoke() end to end

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hdds_mx::{
    BoxError, CompositeDataWriter, DynamicInterface, ManagedInterface, OpenTypeMapper,
    OpenValue, OperationInfo, ParameterInfo, TabularDataWriter, TypeClass,
};
use std::hint::black_box as bb;
use std::sync::Arc;

#[derive(Clone)]
struct Sample {
    id: u32,
    name: String,
    value: f64,
    tags: Vec<String>,
}
impl TypeClass for Sample {}

#[derive(Clone)]
struct Batch {
    label: String,
    head: Sample,
}
impl TypeClass for Batch {}

fn sample(id: u32) -> Sample {
    Sample {
        id,
        name: format!("sample-{}", id),
        value: f64::from(id) * 0.5,
        tags: vec!["a".into(), "b".into()],
    }
}

fn sample_writer(mapper: &Arc<OpenTypeMapper>) -> Arc<CompositeDataWriter<Sample>> {
    CompositeDataWriter::<Sample>::builder()
        .with_type_name("sample")
        .with_type_description("Sample")
        .with_simple_attribute("id", |s: &Sample| s.id)
        .with_simple_attribute("name", |s: &Sample| s.name.clone())
        .with_simple_attribute("value", |s: &Sample| s.value)
        .with_simple_attribute("tags", |s: &Sample| s.tags.clone())
        .with_mapper(Arc::clone(mapper))
        .build()
        .expect("sample writer")
}

fn bench_composite_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite_apply");
    let mapper = Arc::new(OpenTypeMapper::new());
    let flat = sample_writer(&mapper);
    let nested = CompositeDataWriter::<Batch>::builder()
        .with_type_name("batch")
        .with_type_description("Batch")
        .with_simple_attribute("label", |b: &Batch| b.label.clone())
        .with_simple_attribute("head", |b: &Batch| b.head.clone())
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("batch writer");

    let one = sample(1);
    let batch = Batch {
        label: "batch".into(),
        head: sample(2),
    };

    group.bench_function("flat", |b| b.iter(|| bb(flat.apply(bb(&one)))));
    group.bench_function("nested", |b| b.iter(|| bb(nested.apply(bb(&batch)))));
    group.finish();
}

fn bench_tabular_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabular_apply");
    let mapper = Arc::new(OpenTypeMapper::new());
    let table = TabularDataWriter::<Sample>::builder()
        .with_type_name("samples")
        .with_type_description("Samples")
        .with_index_name("id")
        .with_composite_data_writer(sample_writer(&mapper))
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("table writer");

    for rows in [10usize, 100, 1000] {
        let samples: Vec<Sample> = (0..rows as u32).map(sample).collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &samples, |b, samples| {
            b.iter(|| bb(table.apply(bb(samples))));
        });
    }
    group.finish();
}

fn bench_interface(c: &mut Criterion) {
    let mut group = c.benchmark_group("interface");
    let mapper = Arc::new(OpenTypeMapper::new());
    let writer = sample_writer(&mapper);

    let scale = OperationInfo::builder()
        .with_name("scale")
        .with_parameter(
            ParameterInfo::builder()
                .with_class::<f64>()
                .with_name("factor")
                .with_mapper(Arc::clone(&mapper))
                .build()
                .expect("parameter"),
        )
        .with_return::<f64>()
        .with_invoker(|args: &[OpenValue]| {
            let factor = args[0].as_f64().ok_or("factor")?;
            Ok::<_, BoxError>(OpenValue::F64(factor * 2.0))
        })
        .with_mapper(Arc::clone(&mapper))
        .build()
        .expect("operation");

    let interface = DynamicInterface::builder()
        .with_simple_attribute("count", "Count", || 42u64)
        .with_composite_attribute("latest", || sample(7), writer)
        .with_operation(scale)
        .with_mapper(mapper)
        .build()
        .expect("interface");

    group.bench_function("attribute_simple", |b| {
        b.iter(|| bb(interface.attribute(bb("count"))));
    });
    group.bench_function("attribute_composite", |b| {
        b.iter(|| bb(interface.attribute(bb("latest"))));
    });
    let args = [OpenValue::F64(1.5)];
    group.bench_function("invoke", |b| {
        b.iter(|| bb(interface.invoke(bb("scale"), bb(&args))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_composite_apply,
    bench_tabular_apply,
    bench_interface
);
criterion_main!(benches);
