#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Cumulative fixed-bucket histograms.
//!
//! A histogram counts observed integer magnitudes against a fixed set of bucket boundaries
//! chosen when the histogram is created. Each bucket is cumulative: the bucket with boundary
//! `b` counts every observation with a magnitude `<= b`. Alongside the buckets, each histogram
//! keeps the total count, sum and mean of its observations.
//!
//! This is an exact scheme with caller-chosen buckets, not an approximating sketch.
//!
//! # Histogram kinds
//!
//! All histograms implement the [`Histogram`] trait, so reporting code can treat them alike:
//!
//! * [`LiveHistogram`] - records observations. Safe to update and read from many threads.
//! * [`HistogramSnapshot`] - a read-only copy of a histogram at one point in time, returned
//!   by [`Histogram::snapshot()`]. Attempting to update or clear it panics.
//! * [`NullHistogram`] - discards everything and reports zeros. Used when metrics collection
//!   is disabled via [`MetricsConfig`].
//!
//! # Recording observations
//!
//! ```
//! use fixed_histogram::{Histogram, HistogramBuilder};
//!
//! const PACKAGE_WEIGHT_GRAMS_BUCKETS: &[f64] = &[100.0, 200.0, 500.0, 1000.0, 5000.0];
//!
//! let histogram = HistogramBuilder::new()
//!     .buckets(PACKAGE_WEIGHT_GRAMS_BUCKETS.iter().copied())
//!     .build();
//!
//! histogram.update(150);
//! histogram.update(900);
//! histogram.update(7000);
//!
//! assert_eq!(histogram.count(), 3);
//! assert_eq!(histogram.sum(), 8050);
//!
//! // 150 and 900 are both at or below 1000. 7000 is above every boundary,
//! // so it only shows up in the totals.
//! assert_eq!(histogram.bucket(200.0), 1);
//! assert_eq!(histogram.bucket(1000.0), 2);
//! assert_eq!(histogram.bucket(5000.0), 2);
//! ```
//!
//! # Reporting
//!
//! Take a snapshot to get a consistent view of the data without holding up threads
//! that keep recording observations. The snapshot can be inspected at leisure:
//!
//! ```
//! use fixed_histogram::{Histogram, HistogramBuilder};
//!
//! let histogram = HistogramBuilder::new().buckets([1.0, 10.0, 100.0]).build();
//! histogram.update(5);
//!
//! let snapshot = histogram.snapshot();
//!
//! for (boundary, count) in &snapshot.buckets() {
//!     println!("le {boundary}: {count}");
//! }
//!
//! // There is also a human-readable rendering of the whole histogram.
//! println!("{snapshot}");
//! ```
//!
//! # Registering histograms by name
//!
//! A [`Registry`] hands out one shared histogram per name. [`HistogramRegistry`] is an
//! in-memory implementation. There is no global registry - pass one to the code that needs it.
//!
//! ```
//! use fixed_histogram::{Histogram, HistogramBuilder, HistogramRegistry, MetricsConfig};
//!
//! let config = MetricsConfig::from_env();
//! let registry = HistogramRegistry::new();
//!
//! fn record_connect_time(registry: &HistogramRegistry, config: &MetricsConfig, millis: i64) {
//!     HistogramBuilder::new()
//!         .name("net_http_connect_time_ms")
//!         .buckets([10.0, 50.0, 100.0, 500.0])
//!         .config(config)
//!         .get_or_register(registry)
//!         .update(millis);
//! }
//!
//! record_connect_time(&registry, &config, 42);
//! record_connect_time(&registry, &config, 420);
//!
//! registry.for_each(|name, histogram| {
//!     println!("{name}: {} observations", histogram.count());
//! });
//! ```
//!
//! # Panic policy
//!
//! This crate may panic when creating histograms if an invalid configuration is supplied,
//! such as a NaN bucket boundary or a missing name for registration. Updating or clearing a
//! [`HistogramSnapshot`] also panics, as it indicates a logic error in the caller.
//!
//! This crate will not panic for "mathematical" reasons during observation,
//! such as overflow due to excessively large counts or magnitudes.
//!
//! # Mathematics policy
//!
//! Counts and sums use wrapping arithmetic. Attempting to use magnitudes near the `i64`
//! limits may result in mangled data. Magnitudes are compared to boundaries as `f64`, so
//! magnitudes beyond 2^53 in absolute value may be counted against a neighboring boundary.

mod buckets;
mod builder;
mod config;
mod data_types;
mod error;
mod histogram;
mod live_histogram;
mod null_histogram;
mod registry;
mod snapshot;

pub use buckets::*;
pub use builder::*;
pub use config::*;
pub use data_types::*;
pub use error::*;
pub use histogram::*;
pub use live_histogram::*;
pub use null_histogram::*;
pub use registry::*;
pub use snapshot::*;
