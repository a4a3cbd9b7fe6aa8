use ordered_float::FloatIsNan;

/// Reasons a checked interval constructor refuses its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// One of the bounds was NaN and has no place on an ordered axis.
    #[error("interval bound is NaN")]
    NotANumber(#[from] FloatIsNan),
    /// `start > end`; such an interval can never contain a point.
    #[error("interval start exceeds its end")]
    Inverted,
}
