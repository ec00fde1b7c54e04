use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use xmlpretty::{AttributeRules, Document};

const SRC: &str = include_str!("../tests/books.xml");

fn parse_xml(src: &str) {
    let _ = Document::parse(src).unwrap();
}

fn format_xml(document: &Document) {
    let _ = document.to_xml(3).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse_xml", |b| b.iter(|| parse_xml(black_box(SRC))));

    let document = Document::parse(SRC).unwrap();
    c.bench_function("format_xml", |b| b.iter(|| format_xml(black_box(&document))));

    let rules = AttributeRules::new(true, Vec::<String>::new());
    c.bench_function("sort_attributes", |b| {
        b.iter(|| {
            let mut doc = document.clone();
            rules.apply(&mut doc.root);
            black_box(doc)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
