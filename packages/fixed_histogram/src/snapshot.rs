use std::sync::Arc;

use crate::{Boundary, Buckets, Histogram, HistogramState, Magnitude, SharedHistogram, mean_of};

/// A read-only copy of the state of a histogram at one point in time.
///
/// Obtained from [`Histogram::snapshot()`]. The data is copied when the snapshot is taken,
/// so later observations recorded by the source histogram do not show up here.
///
/// Calling [`Histogram::update()`] or [`Histogram::clear()`] on a snapshot is a programming
/// error and panics.
///
/// Clones of a snapshot share the same frozen data, as do further snapshots taken from it.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, LiveHistogram};
///
/// let histogram = LiveHistogram::new(&[10.0]);
/// histogram.update(5);
///
/// let snapshot = histogram.snapshot();
/// histogram.update(7);
///
/// assert_eq!(snapshot.count(), 1);
/// assert_eq!(histogram.count(), 2);
///
/// println!("{snapshot:?}");
/// ```
#[derive(Clone, Debug)]
pub struct HistogramSnapshot {
    state: Arc<HistogramState>,
}

impl HistogramSnapshot {
    pub(crate) fn new(state: HistogramState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }
}

impl Histogram for HistogramSnapshot {
    fn update(&self, _magnitude: Magnitude) {
        panic!("update on a histogram snapshot is not supported");
    }

    fn count(&self) -> u64 {
        self.state.count
    }

    fn sum(&self) -> Magnitude {
        self.state.sum
    }

    fn mean(&self) -> f64 {
        mean_of(self.state.count, self.state.sum)
    }

    fn bucket(&self, boundary: Boundary) -> u64 {
        self.state.buckets.get(boundary)
    }

    fn buckets(&self) -> Buckets {
        self.state.buckets.clone()
    }

    fn clear(&self) {
        panic!("clear on a histogram snapshot is not supported");
    }

    fn snapshot(&self) -> SharedHistogram {
        // Already frozen - share the data instead of copying it again.
        Arc::new(self.clone())
    }
}
