use cnbin_core::models::Region;
use cnbin_overlaprs::ChromIndex;

///
/// Sum, over `intervals`, of the base pairs each one shares with `bin`.
///
/// Intervals on another chromosome or wholly outside the bin contribute 0, as do malformed
/// intervals. Overlapping intervals are counted once each, so the result only stays within
/// the bin width when the intervals are disjoint.
///
/// ```
/// use cnbin_calls::base_pairs_per_bin;
/// use cnbin_core::models::Region;
///
/// let bin = Region { chr: "chr1".to_string(), start: 0, end: 1000 };
/// let intervals = vec![
///     Region { chr: "chr1".to_string(), start: 900, end: 1500 },
///     Region { chr: "chr1".to_string(), start: 2000, end: 3000 },
/// ];
/// assert_eq!(base_pairs_per_bin(&bin, &intervals), 100);
/// ```
pub fn base_pairs_per_bin<'a>(bin: &Region, intervals: impl IntoIterator<Item = &'a Region>) -> u64 {
    intervals
        .into_iter()
        .map(|interval| bin.overlap_len(interval) as u64)
        .sum()
}

/// [base_pairs_per_bin] restricted to the candidates an index returns for the bin.
pub fn base_pairs_in_index<T>(bin: &Region, index: &ChromIndex<T>) -> u64
where
    T: Eq + Clone + Send + Sync,
{
    index
        .find_iter(&bin.chr, bin.start, bin.end)
        .map(|iv| iv.intersect_len(bin.start, bin.end) as u64)
        .sum()
}

/// Fraction of `bin` covered by `base_pairs`. Zero-width bins have no coverage.
pub fn coverage_fraction(bin: &Region, base_pairs: u64) -> f64 {
    match bin.width() {
        0 => 0.0,
        width => base_pairs as f64 / width as f64,
    }
}
