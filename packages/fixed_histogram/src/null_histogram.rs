use std::sync::Arc;

use crate::{Boundary, Buckets, Histogram, Magnitude, SharedHistogram};

/// A histogram that ignores all observations and always reports zero.
///
/// Stands in for a real histogram when metrics collection is disabled, so calling code can
/// use the same [`Histogram`] operations either way. Builders produce this type when given a
/// disabled [`MetricsConfig`][1].
///
/// [1]: crate::MetricsConfig
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NullHistogram;

impl Histogram for NullHistogram {
    #[cfg_attr(test, mutants::skip)] // Nothing to mutate.
    #[inline]
    fn update(&self, _magnitude: Magnitude) {}

    #[inline]
    fn count(&self) -> u64 {
        0
    }

    #[inline]
    fn sum(&self) -> Magnitude {
        0
    }

    #[inline]
    fn mean(&self) -> f64 {
        0.0
    }

    #[inline]
    fn bucket(&self, _boundary: Boundary) -> u64 {
        0
    }

    fn buckets(&self) -> Buckets {
        Buckets::new()
    }

    #[cfg_attr(test, mutants::skip)] // Nothing to mutate.
    #[inline]
    fn clear(&self) {}

    fn snapshot(&self) -> SharedHistogram {
        Arc::new(Self)
    }
}
