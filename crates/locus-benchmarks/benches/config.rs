//! locus.toml parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use locus_benchmarks::criterion_config;
use locus_config::toml::{parse_locus_toml, serialize_locus_toml};
use locus_config::{ConfigLayering, LocusToml};
use std::collections::HashMap;

const SAMPLE: &str = r#"
[client]
api_base_url = "https://api.example.com"
timeout_ms = 5000
cache_ttl_ms = 60000
max_retries = 3
retry_delay_ms = 500
token_key = "auth_token"
storage_dir = "/var/lib/locus"
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_locus_toml", |b| {
        b.iter(|| black_box(parse_locus_toml(black_box(SAMPLE)).unwrap()));
    });

    let config = parse_locus_toml(SAMPLE).unwrap();
    c.bench_function("serialize_locus_toml", |b| {
        b.iter(|| black_box(serialize_locus_toml(&config).unwrap()));
    });
}

fn bench_layering(c: &mut Criterion) {
    let env: HashMap<String, String> = [
        ("LOCUS_API_URL", "https://staging.example.com"),
        ("LOCUS_TIMEOUT_MS", "2500"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    let cli: HashMap<String, String> = [("timeout_ms".to_string(), "1000".to_string())].into_iter().collect();

    c.bench_function("merge_configs", |b| {
        b.iter(|| black_box(ConfigLayering::merge_configs(LocusToml::default(), &env, &cli).unwrap()));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_parse, bench_layering
}
criterion_main!(benches);
