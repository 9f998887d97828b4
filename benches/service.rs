//! Service benchmarks
//!
//! Measures issuing, full validation with cached constraint sets and the
//! parse-only inspection paths for each HMAC algorithm.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jwt_bearer::*;
use serde_json::json;

const ALGORITHMS: [HmacAlgorithm; 3] = [
    HmacAlgorithm::HS256,
    HmacAlgorithm::HS384,
    HmacAlgorithm::HS512,
];

fn service(algorithm: HmacAlgorithm) -> JwtService {
    JwtService::new(&JwtConfig::default().algorithm(algorithm).uid("bench-user"))
        .expect("default configuration is valid")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let payload = json!({ "role": "admin", "scopes": ["read", "write"] });

    for algorithm in ALGORITHMS {
        let service = service(algorithm);
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm),
            &payload,
            |b, payload| b.iter(|| service.encode(black_box(payload), None).unwrap()),
        );
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for algorithm in ALGORITHMS {
        let service = service(algorithm);
        let token = service.encode("payload", None).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(algorithm), &token, |b, token| {
            b.iter(|| service.decode(black_box(token)).unwrap())
        });
    }

    group.finish();
}

fn bench_inspection(c: &mut Criterion) {
    let service = service(HmacAlgorithm::HS256);
    let token = service.encode("payload", None).unwrap();

    c.bench_function("is_valid", |b| b.iter(|| service.is_valid(black_box(&token))));
    c.bench_function("extract_claims_unsafe", |b| {
        b.iter(|| service.extract_claims_unsafe(black_box(&token)))
    });
    c.bench_function("is_expired", |b| {
        b.iter(|| service.is_expired(black_box(&token)))
    });
}

fn bench_uncached_decode(c: &mut Criterion) {
    let service = service(HmacAlgorithm::HS256);
    let token = service.encode("payload", None).unwrap();

    c.bench_function("decode_after_clear_cache", |b| {
        b.iter(|| {
            service.clear_cache();
            service.decode(black_box(&token)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_inspection,
    bench_uncached_decode
);
criterion_main!(benches);
