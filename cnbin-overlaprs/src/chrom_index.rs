use fxhash::FxHashMap as HashMap;

use cnbin_core::models::{Interval, Region};

use crate::{Overlapper, SortedIntervals};

/// Intervals grouped by chromosome, one [`SortedIntervals`] per chromosome.
///
/// Queries on a chromosome the index has never seen yield nothing, so a bin is only ever
/// compared against intervals of its own chromosome.
#[derive(Debug, Clone)]
pub struct ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    index_maps: HashMap<String, SortedIntervals<u32, T>>,
}

impl<T> ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    pub fn new<'r>(regions: impl IntoIterator<Item = (&'r Region, T)>) -> Self {
        // STEP 1: organize intervals into vectors, one for each chrom
        let mut intervals: HashMap<String, Vec<Interval<u32, T>>> = HashMap::default();
        for (region, val) in regions {
            intervals
                .entry(region.chr.clone())
                .or_default()
                .push(Interval {
                    start: region.start,
                    end: region.end,
                    val,
                });
        }

        // STEP 2: sort each chromosome
        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, SortedIntervals::build(chr_intervals)))
            .collect();

        ChromIndex { index_maps }
    }

    pub fn get(&self, chr: &str) -> Option<&SortedIntervals<u32, T>> {
        self.index_maps.get(chr)
    }

    /// Intervals on `chr` overlapping `[start, end)`.
    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: u32,
        end: u32,
    ) -> Box<dyn Iterator<Item = &'a Interval<u32, T>> + 'a> {
        match self.index_maps.get(chr) {
            Some(intervals) => intervals.find_iter(start, end),
            None => Box::new(std::iter::empty()),
        }
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.index_maps.keys().map(|chr| chr.as_str())
    }

    /// Total number of intervals across all chromosomes.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|iv| iv.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union overlapping intervals on every chromosome.
    pub fn merge_overlaps(&self) -> Self {
        ChromIndex {
            index_maps: self
                .index_maps
                .iter()
                .map(|(chr, intervals)| (chr.clone(), intervals.merge_overlaps()))
                .collect(),
        }
    }
}

impl<T> Default for ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    fn default() -> Self {
        ChromIndex {
            index_maps: HashMap::default(),
        }
    }
}

impl<'r, T> FromIterator<(&'r Region, T)> for ChromIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    fn from_iter<It: IntoIterator<Item = (&'r Region, T)>>(iter: It) -> Self {
        ChromIndex::new(iter)
    }
}
