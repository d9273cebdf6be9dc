use std::sync::Arc;

use tracing::trace;

use crate::{
    Boundary, HistogramName, LiveHistogram, MetricsConfig, NullHistogram, Registry, Result,
    SharedHistogram,
};

/// Creates histograms, optionally registering them by name.
///
/// Use `HistogramBuilder::new()` or `LiveHistogram::builder()` to create a new instance.
///
/// Required parameters:
/// * `name` - only when registering with a [`Registry`].
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, HistogramBuilder, HistogramRegistry, MetricsConfig};
///
/// const RESPONSE_TIME_BUCKETS_MS: &[f64] = &[1.0, 10.0, 50.0, 100.0, 500.0, 1000.0];
///
/// let config = MetricsConfig::from_env();
/// let registry = HistogramRegistry::new();
///
/// let histogram = HistogramBuilder::new()
///     .name("http_response_time_ms")
///     .buckets(RESPONSE_TIME_BUCKETS_MS.iter().copied())
///     .config(&config)
///     .get_or_register(&registry);
///
/// histogram.update(42);
/// ```
#[derive(Debug, Default)]
pub struct HistogramBuilder {
    name: HistogramName,

    /// Upper bounds (inclusive) of the cumulative buckets.
    /// Defaults to empty, which means only count and sum are tracked.
    boundaries: Vec<Boundary>,

    config: MetricsConfig,
}

impl HistogramBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used when registering the histogram.
    ///
    /// Recommended format: `big_medium_small_units`
    /// For example: `net_http_connect_time_ms`
    #[must_use]
    pub fn name(self, name: impl Into<HistogramName>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Sets the bucket boundaries, replacing any set previously.
    ///
    /// The boundaries may be given in any order; duplicates are collapsed.
    ///
    /// # Panics
    ///
    /// Panics if any boundary is NaN.
    #[must_use]
    pub fn buckets(self, boundaries: impl IntoIterator<Item = Boundary>) -> Self {
        let boundaries = boundaries.into_iter().collect::<Vec<_>>();

        assert!(
            !boundaries.iter().any(|b| b.is_nan()),
            "histogram bucket boundaries must not be NaN"
        );

        Self { boundaries, ..self }
    }

    /// Applies process-level metrics settings.
    #[must_use]
    pub fn config(self, config: &MetricsConfig) -> Self {
        Self {
            config: *config,
            ..self
        }
    }

    /// Shorthand for enabling or disabling metrics collection for this histogram only.
    ///
    /// A disabled builder produces a [`NullHistogram`].
    #[must_use]
    pub fn enabled(self, enabled: bool) -> Self {
        Self {
            config: self.config.with_enabled(enabled),
            ..self
        }
    }

    /// Builds a new histogram with no observations.
    ///
    /// This is a [`LiveHistogram`] if metrics collection is enabled,
    /// otherwise a [`NullHistogram`].
    #[must_use]
    pub fn build(self) -> SharedHistogram {
        if !self.config.is_enabled() {
            trace!(name = %self.name, "metrics disabled, building null histogram");
            return Arc::new(NullHistogram);
        }

        Arc::new(LiveHistogram::new(&self.boundaries))
    }

    /// Builds a new histogram and registers it under the configured name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`][1] if the name is already taken in the registry.
    ///
    /// # Panics
    ///
    /// Panics if no name has been set.
    ///
    /// [1]: crate::Error::DuplicateName
    pub fn register<R>(self, registry: &R) -> Result<SharedHistogram>
    where
        R: Registry,
    {
        let name = self.required_name();
        let histogram = self.build();

        registry.register(name, Arc::clone(&histogram))?;

        Ok(histogram)
    }

    /// Returns the histogram already registered under the configured name, or builds and
    /// registers a new one if there is none.
    ///
    /// If a histogram is already registered, this builder's buckets and configuration
    /// are ignored.
    ///
    /// # Panics
    ///
    /// Panics if no name has been set.
    #[must_use]
    pub fn get_or_register<R>(self, registry: &R) -> SharedHistogram
    where
        R: Registry,
    {
        let name = self.required_name();

        registry.get_or_register(name, || self.build())
    }

    fn required_name(&self) -> HistogramName {
        assert!(
            !self.name.is_empty(),
            "a histogram must have a name to be registered"
        );

        self.name.clone()
    }
}
