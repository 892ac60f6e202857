use criterion::{Criterion, black_box, criterion_group, criterion_main};

use evatr::core::*;
use evatr::core::wire::{WireResponse, from_wire_response};

const MIXED_IDS: &[&str] = &[
    "DE123456789",
    "de 123 456 789",
    "ATU12345678",
    "FRAB123456789",
    "NL123456789B01",
    "IE1A23456B",
    "SE123456789001",
    "CHE123456789",
    "INVALID",
    "",
];

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_decorated", |b| {
        b.iter(|| black_box(normalize_vat_id(black_box("de-123.456 789"))));
    });
}

fn bench_syntax_check(c: &mut Criterion) {
    c.bench_function("check_syntax_mixed_10", |b| {
        b.iter(|| {
            for id in MIXED_IDS {
                black_box(check_vat_id_syntax(black_box(id)));
            }
        });
    });
}

fn bench_check_digit(c: &mut Criterion) {
    c.bench_function("german_check_digit", |b| {
        b.iter(|| black_box(german_check_digit(black_box("123456788"))));
    });
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = StatusRegistry::new();
    c.bench_function("registry_is_success", |b| {
        b.iter(|| black_box(registry.is_success(black_box("evatr-2006"))));
    });
    c.bench_function("registry_statistics", |b| {
        b.iter(|| black_box(registry.statistics()));
    });
}

fn bench_extended_projection(c: &mut Criterion) {
    let registry = StatusRegistry::new();
    let wire: WireResponse = serde_json::from_str(
        r#"{"id":"x","anfrageZeitpunkt":"2025-07-23T14:30:00.000Z","status":"evatr-2006",
            "gueltigAb":"2020-01-01","gueltigBis":"2024-12-31"}"#,
    )
    .unwrap();
    c.bench_function("into_extended", |b| {
        b.iter(|| {
            let result = from_wire_response(wire.clone(), "DE123456789", "ATU12345678");
            black_box(result.into_extended(&registry))
        });
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_syntax_check,
    bench_check_digit,
    bench_registry_lookup,
    bench_extended_projection,
);
criterion_main!(benches);
