use std::env;

/// Environment variable that disables metrics collection when set to `1` or `true`.
///
/// Read by [`MetricsConfig::from_env()`].
pub const DISABLE_METRICS_ENV_VAR: &str = "FIXED_HISTOGRAM_DISABLED";

/// Process-level metrics settings, passed explicitly to the code that creates histograms.
///
/// When metrics are disabled, [`HistogramBuilder`][1] produces [`NullHistogram`][2] instances
/// that discard all observations, so callers do not need to branch at every call site.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, HistogramBuilder, MetricsConfig};
///
/// let config = MetricsConfig::new().with_enabled(false);
///
/// let histogram = HistogramBuilder::new()
///     .buckets([1.0, 10.0])
///     .config(&config)
///     .build();
///
/// histogram.update(5);
/// assert_eq!(histogram.count(), 0);
/// ```
///
/// [1]: crate::HistogramBuilder
/// [2]: crate::NullHistogram
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetricsConfig {
    enabled: bool,
}

impl MetricsConfig {
    /// Creates the default configuration, with metrics collection enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self { enabled: true }
    }

    /// Loads the configuration from the process environment.
    ///
    /// Metrics collection is disabled if [`DISABLE_METRICS_ENV_VAR`] is set to `1` or `true`
    /// (case-insensitive). Any other value, or no value, leaves it enabled.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Environment access is not covered by unit tests.
    pub fn from_env() -> Self {
        Self::from_env_value(env::var(DISABLE_METRICS_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(disabled: Option<&str>) -> Self {
        let disabled = disabled.is_some_and(|value| {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true")
        });

        Self::new().with_enabled(!disabled)
    }

    /// Sets whether metrics collection is enabled.
    #[must_use]
    pub const fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether metrics collection is enabled.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::new()
    }
}
