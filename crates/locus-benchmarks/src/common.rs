//! Common utilities for benchmarks

use std::collections::BTreeMap;

use criterion::Criterion;
use locus_client::ApiResponse;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// A 200 response with a JSON array of `items` locations
pub fn sample_response(url: &str, items: usize) -> ApiResponse {
    let body: Vec<serde_json::Value> = (0..items)
        .map(|i| serde_json::json!({ "id": i, "name": format!("location-{}", i), "score": i % 10 }))
        .collect();

    ApiResponse {
        status: 200,
        url: url.to_string(),
        headers: BTreeMap::new(),
        body: serde_json::to_vec(&body).unwrap_or_default(),
        cached: false,
    }
}
