use std::cmp;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use num_traits::AsPrimitive;

use crate::{Boundary, Buckets, Magnitude};

/// A histogram behind a shared reference, as handed out by builders and registries.
pub type SharedHistogram = Arc<dyn Histogram>;

/// Operations common to every kind of cumulative fixed-bucket histogram.
///
/// Implemented by:
///
/// * [`LiveHistogram`][1] - records observations, safe to share between threads.
/// * [`HistogramSnapshot`][2] - a frozen copy of a live histogram, read-only.
/// * [`NullHistogram`][3] - ignores everything, used when metrics collection is disabled.
///
/// Reporting code can work with any of them through a [`SharedHistogram`] without knowing
/// which one it holds.
///
/// # Cumulative buckets
///
/// Every histogram has a fixed set of bucket boundaries. The count of the bucket with
/// boundary `b` is the number of observations with magnitude `<= b`, so one observation
/// is counted in every bucket at or above its magnitude.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, HistogramBuilder, SharedHistogram};
///
/// let histogram: SharedHistogram = HistogramBuilder::new().buckets([1.0, 5.0, 10.0]).build();
///
/// histogram.update(3);
/// histogram.update(7);
///
/// assert_eq!(histogram.count(), 2);
/// assert_eq!(histogram.bucket(1.0), 0);
/// assert_eq!(histogram.bucket(5.0), 1);
/// assert_eq!(histogram.bucket(10.0), 2);
/// ```
///
/// [1]: crate::LiveHistogram
/// [2]: crate::HistogramSnapshot
/// [3]: crate::NullHistogram
pub trait Histogram: Debug + Send + Sync {
    /// Records one observation with the given magnitude.
    ///
    /// # Panics
    ///
    /// Panics if called on a [`HistogramSnapshot`][1], which is read-only.
    ///
    /// [1]: crate::HistogramSnapshot
    fn update(&self, magnitude: Magnitude);

    /// The number of observations recorded.
    fn count(&self) -> u64;

    /// The sum of the magnitudes of all observations recorded.
    fn sum(&self) -> Magnitude;

    /// The mean magnitude of all observations recorded, or `0.0` if there are none.
    fn mean(&self) -> f64;

    /// The cumulative count for the bucket with the given boundary.
    ///
    /// Returns zero if there is no bucket with this boundary.
    fn bucket(&self, boundary: Boundary) -> u64;

    /// An independent copy of all the buckets and their cumulative counts.
    fn buckets(&self) -> Buckets;

    /// Resets the count, sum and all bucket counts to zero. The boundaries remain.
    ///
    /// # Panics
    ///
    /// Panics if called on a [`HistogramSnapshot`][1], which is read-only.
    ///
    /// [1]: crate::HistogramSnapshot
    fn clear(&self);

    /// Captures the current state as a read-only histogram that is not affected
    /// by any later changes to this one.
    fn snapshot(&self) -> SharedHistogram;
}

/// Convenience operations available on every [`Histogram`].
pub trait HistogramExt: Histogram {
    /// Records one observation, converting the magnitude from any primitive numeric type.
    ///
    /// Values outside the `i64` range are not guaranteed to be correctly represented.
    ///
    /// # Example
    ///
    /// ```
    /// use fixed_histogram::{Histogram, HistogramExt, LiveHistogram};
    ///
    /// let histogram = LiveHistogram::new(&[10.0]);
    ///
    /// histogram.observe(3_u8);
    /// histogram.observe(4_usize);
    /// histogram.observe(2.9);
    ///
    /// assert_eq!(histogram.sum(), 9);
    /// ```
    #[inline]
    fn observe(&self, magnitude: impl AsPrimitive<Magnitude>) {
        self.update(magnitude.as_());
    }

    /// Whether no observations have been recorded.
    #[inline]
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl<T> HistogramExt for T where T: Histogram + ?Sized {}

/// Human-readable rendering for terminals and logs.
///
/// The first line holds the count, sum and mean, followed by one line per bucket.
/// The data is read from a snapshot, so all the numbers are consistent with each other
/// even if the histogram is being updated concurrently.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, HistogramBuilder};
///
/// let histogram = HistogramBuilder::new().buckets([1.0, 10.0]).build();
/// histogram.update(5);
///
/// println!("{histogram}");
/// ```
impl Display for dyn Histogram + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        let buckets = snapshot.buckets();

        writeln!(
            f,
            "{}; sum {}; mean {}",
            snapshot.count(),
            snapshot.sum(),
            snapshot.mean()
        )?;

        // We measure the dynamic parts of each line to know how much padding to add.
        let (widest_boundary, widest_count) =
            buckets
                .iter()
                .fold((0, 0), |(boundary_width, count_width), (boundary, count)| {
                    (
                        cmp::max(boundary_width, boundary.to_string().len()),
                        cmp::max(count_width, count.to_string().len()),
                    )
                });

        for (boundary, count) in &buckets {
            writeln!(
                f,
                "le {boundary:>widest_boundary$} = {count:>widest_count$}"
            )?;
        }

        Ok(())
    }
}

/// Mean of `count` observations that add up to `sum`, zero if there are none.
#[expect(
    clippy::cast_precision_loss,
    reason = "mean is an approximate figure; precision loss only occurs near the type limits"
)]
pub(crate) fn mean_of(count: u64, sum: Magnitude) -> f64 {
    if count == 0 {
        return 0.0;
    }

    sum as f64 / count as f64
}
