use std::borrow::Cow;

/// Any value in this range is a valid magnitude of an observation.
///
/// Observations are integers. If you are measuring fractional data, scale it up to be
/// representable as integers. For example, instead of counting seconds, count milliseconds.
pub type Magnitude = i64;

/// The inclusive upper bound of a histogram bucket.
///
/// An observation with magnitude `v` is counted in every bucket whose boundary `b`
/// satisfies `v <= b`.
pub type Boundary = f64;

/// The name of a histogram, used for registry keying and display.
///
/// Typically names are `&'static str` but for cases when the exact set of histograms is
/// not known in advance, we also support owned strings via `Cow`.
pub type HistogramName = Cow<'static, str>;
