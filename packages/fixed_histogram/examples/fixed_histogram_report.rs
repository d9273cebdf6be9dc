//! Records request latencies from a few worker threads into a registered histogram
//! and prints periodic reports.

use std::thread;

use fixed_histogram::{
    Histogram, HistogramBuilder, HistogramRegistry, MetricsConfig, SharedHistogram,
};

const REQUEST_DURATION_MS_BUCKETS: &[f64] = &[1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0];

fn request_duration_ms(registry: &HistogramRegistry, config: &MetricsConfig) -> SharedHistogram {
    HistogramBuilder::new()
        .name("http_request_duration_ms")
        .buckets(REQUEST_DURATION_MS_BUCKETS.iter().copied())
        .config(config)
        .get_or_register(registry)
}

fn main() {
    // Set FIXED_HISTOGRAM_DISABLED=1 to see what happens with metrics disabled.
    let config = MetricsConfig::from_env();
    let registry = HistogramRegistry::new();

    thread::scope(|s| {
        for worker in 0..4_i64 {
            let registry = &registry;
            let config = &config;

            s.spawn(move || {
                let histogram = request_duration_ms(registry, config);

                // Some made-up but deterministic latencies.
                for request in 0..250_i64 {
                    histogram.update((request * 37 + worker * 11) % 1200);
                }
            });
        }
    });

    println!("=== Request durations ===");

    registry.for_each(|name, histogram| {
        println!("{name}: {}", histogram.snapshot());
    });

    // Start a fresh measurement period.
    request_duration_ms(&registry, &config).clear();

    println!("After clear:");
    registry.for_each(|name, histogram| {
        println!("{name}: {}", histogram.snapshot());
    });
}
