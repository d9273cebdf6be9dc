use std::iter::Copied;
use std::{mem, slice};

use crate::{Boundary, Magnitude};

/// Cumulative occurrence counts of a histogram, keyed by bucket boundary.
///
/// The count stored for boundary `b` is the number of observations with a magnitude
/// less than or equal to `b`. Counts are therefore non-decreasing in boundary order,
/// as long as the data was produced by a histogram rather than assembled by hand.
///
/// Values of this type are always independent copies. Modifying a `Buckets` obtained from a
/// histogram has no effect on the histogram it came from.
///
/// Iteration yields `(boundary, count)` pairs in ascending boundary order.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, LiveHistogram};
///
/// let histogram = LiveHistogram::new(&[10.0, 100.0]);
/// histogram.update(5);
/// histogram.update(50);
///
/// let buckets = histogram.buckets();
/// assert_eq!(buckets.get(10.0), 1);
/// assert_eq!(buckets.get(100.0), 2);
///
/// // Boundaries that were never configured have no data.
/// assert_eq!(buckets.get(1000.0), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buckets {
    // Ascending by boundary, no duplicates, no NaN, no negative zero.
    entries: Vec<(Boundary, u64)>,
}

impl Buckets {
    /// Creates an empty set of buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set of buckets with the given boundaries, all with a count of zero.
    ///
    /// The boundaries may be given in any order. Duplicates are collapsed into one bucket.
    ///
    /// # Panics
    ///
    /// Panics if any boundary is NaN.
    #[must_use]
    pub fn with_boundaries(boundaries: impl IntoIterator<Item = Boundary>) -> Self {
        boundaries.into_iter().map(|b| (b, 0)).collect()
    }

    /// The cumulative count for the given boundary.
    ///
    /// Returns zero if the boundary is not one of the buckets.
    #[must_use]
    pub fn get(&self, boundary: Boundary) -> u64 {
        self.position(boundary)
            .and_then(|i| self.entries.get(i))
            .map_or(0, |&(_, count)| count)
    }

    /// Mutable access to the count for the given boundary, if such a bucket exists.
    #[must_use]
    pub fn get_mut(&mut self, boundary: Boundary) -> Option<&mut u64> {
        let index = self.position(boundary)?;
        self.entries.get_mut(index).map(|(_, count)| count)
    }

    /// Sets the count for a boundary, adding the bucket if it does not exist yet.
    ///
    /// Returns the previous count if the bucket already existed.
    ///
    /// # Panics
    ///
    /// Panics if the boundary is NaN.
    pub fn insert(&mut self, boundary: Boundary, count: u64) -> Option<u64> {
        let boundary = normalize(boundary);

        match self
            .entries
            .binary_search_by(|(existing, _)| existing.total_cmp(&boundary))
        {
            Ok(index) => self
                .entries
                .get_mut(index)
                .map(|(_, existing)| mem::replace(existing, count)),
            Err(index) => {
                self.entries.insert(index, (boundary, count));
                None
            }
        }
    }

    /// Iterates over the `(boundary, count)` pairs in ascending boundary order.
    pub fn iter(&self) -> Copied<slice::Iter<'_, (Boundary, u64)>> {
        self.entries.iter().copied()
    }

    /// Iterates over the boundaries in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = Boundary> + '_ {
        self.entries.iter().map(|&(boundary, _)| boundary)
    }

    /// The number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no buckets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts one observation in every bucket whose boundary is at or above `magnitude`.
    pub(crate) fn record(&mut self, magnitude: Magnitude) {
        let first_covering = first_covering_index(&self.entries, magnitude);

        if let Some(covering) = self.entries.get_mut(first_covering..) {
            for (_, count) in covering {
                *count = count.wrapping_add(1);
            }
        }
    }

    /// Sets every count to zero, keeping the boundaries.
    pub(crate) fn reset(&mut self) {
        for (_, count) in &mut self.entries {
            *count = 0;
        }
    }

    fn position(&self, boundary: Boundary) -> Option<usize> {
        if boundary.is_nan() {
            return None;
        }

        let boundary = normalize(boundary);

        self.entries
            .binary_search_by(|(existing, _)| existing.total_cmp(&boundary))
            .ok()
    }
}

/// Index of the lowest bucket that an observation of `magnitude` falls into.
///
/// Every bucket from this index onward covers the observation. Equal to `entries.len()`
/// if the magnitude exceeds every boundary.
#[must_use]
fn first_covering_index(entries: &[(Boundary, u64)], magnitude: Magnitude) -> usize {
    #[expect(
        clippy::cast_precision_loss,
        reason = "boundaries are floating point; huge magnitudes may round to a neighbor"
    )]
    let value = magnitude as f64;

    entries.partition_point(|&(boundary, _)| boundary < value)
}

/// Canonical form of a boundary used as a lookup key.
///
/// Negative zero compares equal to zero, so both must name the same bucket.
fn normalize(boundary: Boundary) -> Boundary {
    assert!(
        !boundary.is_nan(),
        "histogram bucket boundaries must not be NaN"
    );

    if boundary == 0.0 { 0.0 } else { boundary }
}

impl FromIterator<(Boundary, u64)> for Buckets {
    /// Later pairs win if the same boundary appears more than once.
    fn from_iter<I: IntoIterator<Item = (Boundary, u64)>>(iter: I) -> Self {
        let mut buckets = Self::new();

        for (boundary, count) in iter {
            buckets.insert(boundary, count);
        }

        buckets
    }
}

impl<'a> IntoIterator for &'a Buckets {
    type Item = (Boundary, u64);
    type IntoIter = Copied<slice::Iter<'a, (Boundary, u64)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
