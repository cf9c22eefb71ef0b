use num_traits::{PrimInt, Unsigned, identities::zero};

use super::Overlapper;
use cnbin_core::models::Interval;

/// Intervals of one chromosome, sorted by start.
///
/// Queries binary-search to the first interval that could still reach the query start
/// (`start - max_len`) and scan forward until interval starts pass the query end.
///
/// ```
/// use cnbin_overlaprs::{Overlapper, SortedIntervals, Interval};
///
/// let segments = SortedIntervals::build(vec![
///     Interval { start: 0u32, end: 100, val: "a" },
///     Interval { start: 150, end: 400, val: "b" },
///     Interval { start: 500, end: 600, val: "c" },
/// ]);
///
/// let hits: Vec<_> = segments.find_iter(90, 200).map(|iv| iv.val).collect();
/// assert_eq!(hits, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct SortedIntervals<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    /// The length of the longest interval
    max_len: I,
}

impl<I, T> Overlapper<I, T> for SortedIntervals<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(mut intervals: Vec<Interval<I, T>>) -> Self {
        intervals.sort();
        let max_len = intervals
            .iter()
            .map(|iv| iv.width())
            .max()
            .unwrap_or_else(zero::<I>);
        SortedIntervals { intervals, max_len }
    }

    fn find_iter<'a>(&'a self, start: I, end: I) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        let floor = start.checked_sub(&self.max_len).unwrap_or_else(zero::<I>);
        let offset = self.intervals.partition_point(|iv| iv.start < floor);
        Box::new(
            self.intervals[offset..]
                .iter()
                .take_while(move |iv| iv.start < end)
                .filter(move |iv| iv.overlaps(start, end)),
        )
    }

    fn len(&self) -> usize {
        self.intervals.len()
    }
}

impl<I, T> SortedIntervals<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I, T>> {
        self.intervals.iter()
    }

    ///
    /// Union overlapping intervals. Touching intervals (`a.end == b.start`) stay separate
    /// since they share no position. The merged interval keeps the payload of its first member.
    ///
    /// ```
    /// use cnbin_overlaprs::{Overlapper, SortedIntervals, Interval};
    ///
    /// let merged = SortedIntervals::build(vec![
    ///     Interval { start: 0u32, end: 10, val: () },
    ///     Interval { start: 5, end: 20, val: () },
    ///     Interval { start: 20, end: 30, val: () },
    /// ])
    /// .merge_overlaps();
    ///
    /// let spans: Vec<(u32, u32)> = merged.iter().map(|iv| (iv.start, iv.end)).collect();
    /// assert_eq!(spans, vec![(0, 20), (20, 30)]);
    /// ```
    pub fn merge_overlaps(&self) -> Self {
        let mut merged: Vec<Interval<I, T>> = Vec::with_capacity(self.intervals.len());
        for iv in self.intervals.iter() {
            match merged.last_mut() {
                Some(last) if iv.start < last.end => {
                    last.end = last.end.max(iv.end);
                }
                _ => merged.push(iv.clone()),
            }
        }
        let max_len = merged
            .iter()
            .map(|iv| iv.width())
            .max()
            .unwrap_or_else(zero::<I>);
        SortedIntervals {
            intervals: merged,
            max_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn build(spans: &[(u32, u32)]) -> SortedIntervals<u32, usize> {
        SortedIntervals::build(
            spans
                .iter()
                .enumerate()
                .map(|(i, &(start, end))| Interval { start, end, val: i })
                .collect(),
        )
    }

    fn hit_ids(index: &SortedIntervals<u32, usize>, start: u32, end: u32) -> Vec<usize> {
        let mut ids: Vec<usize> = index.find_iter(start, end).map(|iv| iv.val).collect();
        ids.sort();
        ids
    }

    #[rstest]
    fn test_long_interval_found_from_far_query() {
        // the long interval starts well before the query; max_len must pull it in
        let index = build(&[(0, 1_000_000), (10, 20), (900_000, 900_010)]);
        assert_eq!(hit_ids(&index, 950_000, 960_000), vec![0]);
    }

    #[rstest]
    #[case(0, 5, vec![0])]
    #[case(5, 15, vec![0, 1])]
    #[case(10, 12, vec![1])]
    #[case(30, 40, vec![])]
    #[case(0, 100, vec![0, 1, 2])]
    fn test_find_iter(#[case] start: u32, #[case] end: u32, #[case] expected: Vec<usize>) {
        let index = build(&[(0, 10), (10, 20), (50, 60)]);
        assert_eq!(hit_ids(&index, start, end), expected);
    }

    #[rstest]
    fn test_find_matches_linear_scan() {
        let spans: Vec<(u32, u32)> = (0..200u32)
            .map(|i| {
                let start = (i * 7919) % 5_000;
                (start, start + (i * 31) % 700)
            })
            .collect();
        let index = build(&spans);

        for query_start in (0..6_000u32).step_by(250) {
            let query_end = query_start + 400;
            let mut expected: Vec<usize> = spans
                .iter()
                .enumerate()
                .filter(|(_, (s, e))| s < e && *s < query_end && *e > query_start)
                .map(|(i, _)| i)
                .collect();
            expected.sort();
            assert_eq!(hit_ids(&index, query_start, query_end), expected);
        }
    }

    #[rstest]
    fn test_empty_intervals_never_hit() {
        let index = build(&[(10, 10), (0, 5)]);
        assert_eq!(hit_ids(&index, 0, 100), vec![1]);
        assert_eq!(index.len(), 2);
    }

    #[rstest]
    fn test_merge_overlaps_unions_nested_intervals() {
        let merged = build(&[(0, 100), (10, 20), (50, 150), (200, 210)]).merge_overlaps();
        let spans: Vec<(u32, u32)> = merged.iter().map(|iv| (iv.start, iv.end)).collect();
        assert_eq!(spans, vec![(0, 150), (200, 210)]);
    }
}
