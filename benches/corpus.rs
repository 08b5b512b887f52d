//! Benchmarks for sequence generation and corpus assembly.
//!
//! The oracle is an in-process stub so only our side is measured.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yacpd_fixtures::prelude::*;

fn stub_oracle() -> FnOracle<impl Fn(PatternFunction, &PriceSeries) -> std::result::Result<Vec<Verdict>, OracleError> + Send + Sync> {
  FnOracle::new(|_, series: &PriceSeries| {
    Ok(series.close.iter().zip(&series.open).map(|(c, o)| if c > o { 100 } else { 0 }).collect())
  })
}

fn bench_random_walk(c: &mut Criterion) {
  let mut group = c.benchmark_group("random_walk");

  for size in [50, 500, 5000].iter() {
    group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &n| {
      b.iter(|| {
        let mut rng = SeedStream::new(42);
        black_box(random_walk(&mut rng, n, Price::new_const(100.0), Volatility::new_const(5.0)))
      })
    });
  }

  group.finish();
}

fn bench_edge_cases(c: &mut Criterion) {
  c.bench_function("edge_cases_100_bars", |b| {
    b.iter(|| {
      for case in EdgeCase::ALL {
        let mut rng = SeedStream::new(42);
        black_box(case.generate(&mut rng, 100));
      }
    })
  });
}

fn bench_fixtures(c: &mut Criterion) {
  let oracle = stub_oracle();

  c.bench_function("build_all_61_fixtures", |b| {
    b.iter(|| black_box(build_all(black_box(&oracle))))
  });
}

fn bench_compact_corpus(c: &mut Criterion) {
  let oracle = stub_oracle();
  let sequential = Config { fuzz_rounds: 10, ..Config::default() };
  let parallel = Config { parallel: true, ..sequential.clone() };

  c.bench_function("compact_corpus_10_rounds", |b| {
    b.iter(|| black_box(build_compact_corpus(&oracle, black_box(&sequential))))
  });

  c.bench_function("compact_corpus_10_rounds_parallel", |b| {
    b.iter(|| black_box(build_compact_corpus(&oracle, black_box(&parallel))))
  });
}

fn bench_serialize(c: &mut Criterion) {
  let oracle = stub_oracle();
  let corpus = build_compact_corpus(&oracle, &Config { fuzz_rounds: 10, ..Config::default() });

  c.bench_function("serialize_compact_corpus", |b| {
    b.iter(|| black_box(serde_json::to_vec(black_box(&corpus)).unwrap()))
  });
}

criterion_group!(
  benches,
  bench_random_walk,
  bench_edge_cases,
  bench_fixtures,
  bench_compact_corpus,
  bench_serialize,
);

criterion_main!(benches);
