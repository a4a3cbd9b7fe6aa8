use std::fmt;
use std::ops::RangeInclusive;

use ordered_float::NotNan;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::IntervalError;

/// A closed interval `[start, end]` on an ordered axis.
///
/// Trees never mutate an interval once it has been inserted. The bounds are
/// expected to satisfy `start <= end`, but [`Interval::new`] does not check
/// this: an inverted interval is stored like any other and simply never
/// contains a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<N> {
    pub start: N,
    pub end: N,
}

impl<N> Interval<N> {
    pub fn new(start: N, end: N) -> Self {
        Interval { start, end }
    }

    /// Whether `point` lies within `[start, end]`, both bounds inclusive.
    pub fn contains(&self, point: &N) -> bool
    where
        N: Ord,
    {
        &self.start <= point && point <= &self.end
    }

    /// Like [`Interval::new`], but refuses bounds with `start > end`.
    pub fn try_new(start: N, end: N) -> Result<Self, IntervalError>
    where
        N: Ord,
    {
        if start > end {
            return Err(IntervalError::Inverted);
        }
        Ok(Interval { start, end })
    }
}

impl Interval<NotNan<f64>> {
    /// Builds a float interval, refusing NaN and inverted bounds.
    pub fn from_f64(start: f64, end: f64) -> Result<Self, IntervalError> {
        Self::try_new(NotNan::new(start)?, NotNan::new(end)?)
    }
}

impl<N> From<(N, N)> for Interval<N> {
    fn from((start, end): (N, N)) -> Self {
        Interval { start, end }
    }
}

impl<N> From<RangeInclusive<N>> for Interval<N> {
    fn from(range: RangeInclusive<N>) -> Self {
        let (start, end) = range.into_inner();
        Interval { start, end }
    }
}

impl<N: fmt::Display> fmt::Display for Interval<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
