use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    Boundary, Buckets, Histogram, HistogramBuilder, HistogramSnapshot, Magnitude, SharedHistogram,
    mean_of,
};

/// A histogram that records observations, safe to use from many threads at once.
///
/// Count, sum and bucket counts are kept under a single reader-writer lock, so readers
/// always see the effects of an observation either completely or not at all.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, LiveHistogram};
///
/// let histogram = LiveHistogram::new(&[1.0, 2.0, 3.0, 5.0, 7.0, 9.0]);
///
/// for value in 1..=10 {
///     histogram.update(value);
/// }
///
/// assert_eq!(histogram.count(), 10);
/// assert_eq!(histogram.sum(), 55);
/// assert_eq!(histogram.bucket(3.0), 3);
/// assert_eq!(histogram.bucket(9.0), 9);
/// ```
#[derive(Debug)]
pub struct LiveHistogram {
    state: RwLock<HistogramState>,
}

/// Everything that changes when an observation is recorded.
#[derive(Clone, Debug, Default)]
pub(crate) struct HistogramState {
    pub(crate) count: u64,
    pub(crate) sum: Magnitude,
    pub(crate) buckets: Buckets,
}

impl LiveHistogram {
    /// Creates a histogram with the given bucket boundaries and no observations.
    ///
    /// The boundaries may be given in any order; duplicates are collapsed.
    ///
    /// # Panics
    ///
    /// Panics if any boundary is NaN.
    #[must_use]
    pub fn new(boundaries: &[Boundary]) -> Self {
        Self::from_parts(0, 0, Buckets::with_boundaries(boundaries.iter().copied()))
    }

    /// Restores a histogram from previously captured data.
    ///
    /// The data is taken as-is. Nothing checks that the bucket counts are cumulative
    /// or consistent with `count`.
    ///
    /// # Example
    ///
    /// ```
    /// use fixed_histogram::{Buckets, Histogram, LiveHistogram};
    ///
    /// let buckets: Buckets = [(10.0, 3), (100.0, 4)].into_iter().collect();
    /// let histogram = LiveHistogram::from_parts(4, 150, buckets);
    ///
    /// histogram.update(50);
    ///
    /// assert_eq!(histogram.count(), 5);
    /// assert_eq!(histogram.bucket(100.0), 5);
    /// ```
    #[must_use]
    pub fn from_parts(count: u64, sum: Magnitude, buckets: Buckets) -> Self {
        Self {
            state: RwLock::new(HistogramState {
                count,
                sum,
                buckets,
            }),
        }
    }

    /// Creates a builder for configuring a new histogram.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Gets replaced with itself by different name, bad mutation.
    pub fn builder() -> HistogramBuilder {
        HistogramBuilder::new()
    }

    /// The configured bucket boundaries, in ascending order.
    #[must_use]
    pub fn boundaries(&self) -> Vec<Boundary> {
        self.state.read().buckets.boundaries().collect()
    }
}

impl Histogram for LiveHistogram {
    fn update(&self, magnitude: Magnitude) {
        let mut state = self.state.write();

        // Wrapping arithmetic: out of range values may be mangled but never panic.
        state.count = state.count.wrapping_add(1);
        state.sum = state.sum.wrapping_add(magnitude);
        state.buckets.record(magnitude);
    }

    fn count(&self) -> u64 {
        self.state.read().count
    }

    fn sum(&self) -> Magnitude {
        self.state.read().sum
    }

    fn mean(&self) -> f64 {
        let state = self.state.read();
        mean_of(state.count, state.sum)
    }

    fn bucket(&self, boundary: Boundary) -> u64 {
        self.state.read().buckets.get(boundary)
    }

    fn buckets(&self) -> Buckets {
        self.state.read().buckets.clone()
    }

    fn clear(&self) {
        let mut state = self.state.write();

        state.count = 0;
        state.sum = 0;
        state.buckets.reset();
    }

    fn snapshot(&self) -> SharedHistogram {
        // The copy is taken under one read lock so count, sum and buckets agree.
        let state = self.state.read().clone();

        Arc::new(HistogramSnapshot::new(state))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::float_cmp, reason = "exact values are expected in these tests")]
    #![allow(clippy::indexing_slicing, reason = "panic is fine in tests")]

    use std::thread;

    use static_assertions::assert_impl_all;

    use super::*;

    const BOUNDARIES: &[Boundary] = &[1.0, 2.0, 3.0, 5.0, 7.0, 9.0];

    assert_impl_all!(LiveHistogram: Send, Sync);

    fn assert_is_ten_thousand(histogram: &dyn Histogram) {
        assert_eq!(histogram.count(), 10_000);
        assert_eq!(histogram.sum(), 50_005_000);
        assert_eq!(histogram.mean(), 5000.5);

        assert_eq!(histogram.bucket(1.0), 1);
        assert_eq!(histogram.bucket(3.0), 3);
        assert_eq!(histogram.bucket(5.0), 5);

        let buckets = histogram.buckets();
        assert_eq!(buckets.get(1.0), 1);
        assert_eq!(buckets.get(3.0), 3);
        assert_eq!(buckets.get(5.0), 5);
    }

    #[test]
    fn empty() {
        let histogram = LiveHistogram::new(BOUNDARIES);

        assert_eq!(histogram.count(), 0);
        assert_eq!(histogram.sum(), 0);
        assert_eq!(histogram.mean(), 0.0);

        assert_eq!(histogram.bucket(1.0), 0);
        assert_eq!(histogram.bucket(3.0), 0);
        assert_eq!(histogram.bucket(5.0), 0);

        let buckets = histogram.buckets();
        assert_eq!(buckets.len(), BOUNDARIES.len());
        assert!(buckets.iter().all(|(_, count)| count == 0));
    }

    #[test]
    fn ten_thousand_updates() {
        let histogram = LiveHistogram::new(BOUNDARIES);

        for value in 1..=10_000 {
            histogram.update(value);
        }

        assert_is_ten_thousand(&histogram);
    }

    #[test]
    fn snapshot_is_isolated_from_later_updates() {
        let histogram = LiveHistogram::new(BOUNDARIES);

        for value in 1..=10_000 {
            histogram.update(value);
        }

        let snapshot = histogram.snapshot();

        histogram.update(0);
        histogram.update(-5);

        assert_is_ten_thousand(snapshot.as_ref());

        assert_eq!(histogram.count(), 10_002);
        assert_eq!(histogram.bucket(1.0), 3);
    }

    #[test]
    fn snapshot_is_isolated_from_clear() {
        let histogram = LiveHistogram::new(BOUNDARIES);
        histogram.update(4);

        let snapshot = histogram.snapshot();
        histogram.clear();

        assert_eq!(snapshot.count(), 1);
        assert_eq!(snapshot.sum(), 4);
        assert_eq!(snapshot.bucket(5.0), 1);
    }

    #[test]
    fn buckets_returns_independent_copies() {
        let histogram = LiveHistogram::new(BOUNDARIES);
        histogram.update(2);

        let mut first = histogram.buckets();
        *first.get_mut(2.0).unwrap() = 1000;
        first.insert(100.0, 1000);

        let second = histogram.buckets();

        assert_eq!(second.get(2.0), 1);
        assert_eq!(second.get(100.0), 0);
        assert_eq!(histogram.bucket(2.0), 1);
        assert_eq!(histogram.bucket(100.0), 0);
    }

    #[test]
    fn unconfigured_boundary_is_zero() {
        let histogram = LiveHistogram::new(BOUNDARIES);

        for value in 1..=100 {
            histogram.update(value);
        }

        assert_eq!(histogram.bucket(4.0), 0);
        assert_eq!(histogram.bucket(0.0), 0);
        assert_eq!(histogram.bucket(1000.0), 0);
    }

    #[test]
    fn buckets_are_monotonic() {
        let histogram = LiveHistogram::new(&[-50.0, -1.0, 0.0, 2.5, 10.0, 64.0, 1000.0]);

        // A deterministic scattering of values, including negatives and values above
        // every boundary.
        let mut value: Magnitude = 17;
        for _ in 0..500 {
            value = (value * 31 + 7) % 2011 - 1000;
            histogram.update(value);
        }

        let counts = histogram
            .buckets()
            .iter()
            .map(|(_, count)| count)
            .collect::<Vec<_>>();

        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert!(counts.iter().all(|&count| count <= histogram.count()));
    }

    #[test]
    fn largest_bucket_covering_everything_equals_count() {
        let histogram = LiveHistogram::new(&[10.0, 100.0]);

        for value in [-3, 0, 7, 99, 100] {
            histogram.update(value);
        }

        assert_eq!(histogram.bucket(100.0), histogram.count());
        assert_eq!(histogram.bucket(10.0), 3);
    }

    #[test]
    fn negative_values_lower_sum_and_mean() {
        let histogram = LiveHistogram::new(&[-10.0, 0.0]);

        histogram.update(-20);
        histogram.update(10);

        assert_eq!(histogram.sum(), -10);
        assert_eq!(histogram.mean(), -5.0);
        assert_eq!(histogram.bucket(-10.0), 1);
        assert_eq!(histogram.bucket(0.0), 1);
    }

    #[test]
    fn clear_resets_counts_and_keeps_boundaries() {
        let histogram = LiveHistogram::new(BOUNDARIES);

        for value in 1..=10 {
            histogram.update(value);
        }

        histogram.clear();

        assert_eq!(histogram.count(), 0);
        assert_eq!(histogram.sum(), 0);
        assert_eq!(histogram.mean(), 0.0);
        assert_eq!(histogram.boundaries(), BOUNDARIES);
        assert!(histogram.buckets().iter().all(|(_, count)| count == 0));

        histogram.update(3);
        assert_eq!(histogram.bucket(3.0), 1);
        assert_eq!(histogram.bucket(2.0), 0);
    }

    #[test]
    fn from_parts_is_not_validated() {
        // Deliberately not cumulative.
        let buckets: Buckets = [(1.0, 10), (2.0, 1)].into_iter().collect();
        let histogram = LiveHistogram::from_parts(3, -7, buckets);

        assert_eq!(histogram.count(), 3);
        assert_eq!(histogram.sum(), -7);
        assert_eq!(histogram.bucket(1.0), 10);
        assert_eq!(histogram.bucket(2.0), 1);

        histogram.update(2);

        assert_eq!(histogram.count(), 4);
        assert_eq!(histogram.sum(), -5);
        assert_eq!(histogram.bucket(1.0), 10);
        assert_eq!(histogram.bucket(2.0), 2);
    }

    #[test]
    fn no_boundaries_still_counts() {
        let histogram = LiveHistogram::new(&[]);

        histogram.update(5);
        histogram.update(6);

        assert_eq!(histogram.count(), 2);
        assert_eq!(histogram.sum(), 11);
        assert!(histogram.buckets().is_empty());
    }

    #[test]
    fn sum_wraps_instead_of_panicking() {
        let histogram = LiveHistogram::new(&[]);

        histogram.update(Magnitude::MAX);
        histogram.update(1);

        assert_eq!(histogram.sum(), Magnitude::MIN);
        assert_eq!(histogram.count(), 2);
    }

    #[test]
    fn concurrent_updates_are_all_recorded() {
        const THREADS: i64 = 4;
        const PER_THREAD: i64 = 2_500;

        let histogram = LiveHistogram::new(BOUNDARIES);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for value in 1..=PER_THREAD {
                        histogram.update(value);
                    }
                });
            }

            // Readers run alongside the writers and must never see a torn state.
            s.spawn(|| {
                for _ in 0..1_000 {
                    let snapshot = histogram.snapshot();
                    assert!(snapshot.bucket(1.0) <= snapshot.bucket(9.0));
                    assert!(snapshot.bucket(9.0) <= snapshot.count());
                }
            });
        });

        assert_eq!(histogram.count(), 10_000);
        assert_eq!(histogram.sum(), THREADS * PER_THREAD * (PER_THREAD + 1) / 2);
        assert_eq!(histogram.bucket(1.0), 4);
        assert_eq!(histogram.bucket(9.0), 36);
    }
}
