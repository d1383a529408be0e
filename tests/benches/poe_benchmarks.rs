//! # Proof-of-Engagement Benchmarks
//!
//! | Operation | Path |
//! |-----------|------|
//! | Address derivation | `domain::services::contract_address` |
//! | Mixed weight | `domain::services::geometric_mean` |
//! | Contract suite bootstrap | `BootstrapApi::bootstrap` |
//! | Genesis with validators | `BootstrapApi::init_genesis` |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_proof_of_engagement::prelude::*;
use qc_tests::poe::fixtures::{TestChain, ESCROW};
use rand::Rng;
use std::time::Duration;

fn bench_pure_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-domain");

    group.bench_function("contract_address", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| black_box(contract_address(rng.gen_range(1..64), rng.gen_range(1..1_000))))
    });

    group.bench_function("geometric_mean", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| black_box(geometric_mean(rng.gen(), rng.gen())))
    });

    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("qc-18-bootstrap");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("bootstrap_contract_suite", |b| {
        b.to_async(&rt).iter(|| async {
            let service = create_test_service();
            let admin = Address::new([0xad; 20]);
            service
                .host()
                .fund(admin, &Coin::new(2 * ESCROW, "utgd"));
            let registry = service
                .bootstrap(&GenesisConfiguration::devnet(admin), &native_code_bundle())
                .await
                .expect("bootstrap");
            black_box(registry)
        })
    });

    for validators in [1u64, 10, 50] {
        group.throughput(Throughput::Elements(validators));
        group.bench_with_input(
            BenchmarkId::new("init_genesis", validators),
            &validators,
            |b, &validators| {
                b.to_async(&rt).iter(|| async move {
                    let chain = TestChain::new(validators, 3);
                    black_box(chain.init_genesis().await.expect("genesis"))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pure_functions, bench_bootstrap);
criterion_main!(benches);
