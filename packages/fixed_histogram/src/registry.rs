use std::collections::hash_map::Entry;
use std::sync::Arc;

use foldhash::{HashMap, HashMapExt};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::{Error, Histogram, HistogramName, Result, SharedHistogram};

/// Maps histogram names to the single shared instance registered under each name.
///
/// This is the capability that [`HistogramBuilder`][1] uses to make histograms discoverable
/// by name. Reporting systems may provide their own implementation; [`HistogramRegistry`] is
/// a ready-made in-memory one.
///
/// [1]: crate::HistogramBuilder
pub trait Registry {
    /// Returns the histogram registered under `name`, or registers and returns the one
    /// produced by `factory` if there is none yet.
    ///
    /// Concurrent callers asking for the same name all receive the same instance.
    fn get_or_register<F>(&self, name: impl Into<HistogramName>, factory: F) -> SharedHistogram
    where
        F: FnOnce() -> SharedHistogram;

    /// Registers a histogram under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a histogram is already registered under this name.
    /// The existing registration is left untouched.
    fn register(&self, name: impl Into<HistogramName>, histogram: SharedHistogram) -> Result<()>;
}

type HistogramMap = HashMap<HistogramName, SharedHistogram>;

/// An in-memory [`Registry`], safe to share between threads.
///
/// There is no process-wide default instance. Create one and pass it to whatever code
/// registers or reports histograms.
///
/// # Example
///
/// ```
/// use fixed_histogram::{Histogram, HistogramBuilder, HistogramRegistry};
///
/// let registry = HistogramRegistry::new();
///
/// let first = HistogramBuilder::new()
///     .name("queue_wait_ms")
///     .buckets([1.0, 10.0, 100.0])
///     .get_or_register(&registry);
///
/// first.update(7);
///
/// // Asking again by the same name yields the same histogram.
/// let second = HistogramBuilder::new()
///     .name("queue_wait_ms")
///     .buckets([1.0, 10.0, 100.0])
///     .get_or_register(&registry);
///
/// assert_eq!(second.count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HistogramRegistry {
    histograms: RwLock<HistogramMap>,
}

impl HistogramRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            histograms: RwLock::new(HashMap::new()),
        }
    }

    /// The histogram registered under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SharedHistogram> {
        self.histograms.read().get(name).map(Arc::clone)
    }

    /// Removes the histogram registered under `name`, returning it if it was present.
    ///
    /// Existing references to the histogram remain usable; it is merely no longer
    /// discoverable through this registry.
    pub fn unregister(&self, name: &str) -> Option<SharedHistogram> {
        let removed = self.histograms.write().remove(name);

        if removed.is_some() {
            debug!(name, "unregistered histogram");
        }

        removed
    }

    /// The number of registered histograms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.histograms.read().len()
    }

    /// Whether no histograms are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histograms.read().is_empty()
    }

    /// The names of all registered histograms, in ascending order.
    #[must_use]
    pub fn names(&self) -> Vec<HistogramName> {
        let mut names = self
            .histograms
            .read()
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        names.sort_unstable();
        names
    }

    /// Inspects every registered histogram via a callback, in ascending name order.
    ///
    /// This holds a read lock, so the callback must not register or unregister
    /// histograms in this registry, under threat of deadlock.
    pub fn for_each(&self, mut f: impl FnMut(&str, &dyn Histogram)) {
        let histograms = self.histograms.read();

        let mut entries = histograms.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        for (name, histogram) in entries {
            f(name, histogram.as_ref());
        }
    }
}

impl Registry for HistogramRegistry {
    /// The factory is called while holding the registry write lock, so it must not
    /// access this registry.
    fn get_or_register<F>(&self, name: impl Into<HistogramName>, factory: F) -> SharedHistogram
    where
        F: FnOnce() -> SharedHistogram,
    {
        let name = name.into();

        // Most likely the histogram is already registered, so we try being optimistic.
        {
            let histograms = self.histograms.read();

            if let Some(existing) = histograms.get(&name) {
                trace!(%name, "found registered histogram");
                return Arc::clone(existing);
            }
        }

        // Another thread may have registered it after we released the read lock,
        // in which case the entry API hands us that one instead.
        let mut histograms = self.histograms.write();

        let histogram = histograms.entry(name).or_insert_with_key(|name| {
            debug!(%name, "registering histogram");
            factory()
        });

        Arc::clone(histogram)
    }

    fn register(&self, name: impl Into<HistogramName>, histogram: SharedHistogram) -> Result<()> {
        let name = name.into();

        match self.histograms.write().entry(name) {
            Entry::Occupied(existing) => Err(Error::DuplicateName {
                name: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                debug!(name = %slot.key(), "registering histogram");
                slot.insert(histogram);
                Ok(())
            }
        }
    }
}
