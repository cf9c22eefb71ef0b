use num_traits::{PrimInt, Unsigned, identities::zero};
use std::cmp::Ordering;

/// A half-open `[start, end)` interval on a single coordinate line, carrying a payload.
///
/// Ordering is by start, then end; the payload does not take part in comparisons.
#[derive(Eq, Debug, Clone)]
pub struct Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Number of positions covered. Malformed intervals (end < start) have width 0.
    #[inline]
    pub fn width(&self) -> I {
        self.end.checked_sub(&self.start).unwrap_or_else(zero::<I>)
    }

    /// Length of the intersection with `[start, end)`.
    #[inline]
    pub fn intersect_len(&self, start: I, end: I) -> I {
        std::cmp::min(self.end, end)
            .checked_sub(&std::cmp::max(self.start, start))
            .unwrap_or_else(zero::<I>)
    }

    /// Whether the interval shares at least one position with `[start, end)`.
    #[inline]
    pub fn overlaps(&self, start: I, end: I) -> bool {
        self.start < self.end && self.start < end && self.end > start
    }
}

impl<I, T> Ord for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<I, T> PartialOrd for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn iv(start: u32, end: u32) -> Interval<u32, ()> {
        Interval { start, end, val: () }
    }

    #[rstest]
    #[case(iv(10, 20), 0, 100, 10)]
    #[case(iv(10, 20), 15, 100, 5)]
    #[case(iv(10, 20), 0, 12, 2)]
    #[case(iv(10, 20), 20, 30, 0)]
    #[case(iv(10, 20), 30, 40, 0)]
    #[case(iv(10, 10), 0, 100, 0)]
    fn test_intersect_len(
        #[case] interval: Interval<u32, ()>,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(interval.intersect_len(start, end), expected);
    }

    #[rstest]
    fn test_width_of_malformed_interval_is_zero() {
        assert_eq!(iv(20, 10).width(), 0);
        assert_eq!(iv(10, 25).width(), 15);
    }

    #[rstest]
    fn test_ordering_ignores_payload() {
        let a = Interval { start: 1u32, end: 5, val: 'a' };
        let b = Interval { start: 1u32, end: 5, val: 'b' };
        let c = Interval { start: 1u32, end: 7, val: 'a' };
        assert!(a == b);
        assert!(a < c);
    }
}
