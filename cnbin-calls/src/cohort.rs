use std::collections::BTreeMap;

use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;

use cnbin_core::models::{Bin, BinCall, Region, Segment};
use cnbin_core::{CnBinError, Result};

use crate::calling::{CallParams, SampleCalls, UncallableMask, call_bin_status_with_mask};

///
/// Segments of a cohort grouped by sample, in sample id order.
///
/// Samples whose rows could not be read are kept with the reason, so they fail on their
/// own while the rest of the cohort is still called.
///
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    samples: BTreeMap<String, Vec<Segment>>,
    load_errors: BTreeMap<String, String>,
}

impl SegmentTable {
    pub fn new() -> Self {
        SegmentTable::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.samples
            .entry(segment.sample_id.clone())
            .or_default()
            .push(segment);
    }

    /// Register a sample even if none of its rows yields a segment.
    pub fn add_sample(&mut self, sample_id: &str) {
        if !self.samples.contains_key(sample_id) {
            self.samples.insert(sample_id.to_string(), Vec::new());
        }
    }

    /// Mark a sample as unreadable; only the first reason is kept.
    pub fn add_load_error(&mut self, sample_id: &str, reason: String) {
        self.add_sample(sample_id);
        self.load_errors.entry(sample_id.to_string()).or_insert(reason);
    }

    pub fn segments(&self, sample_id: &str) -> Option<&[Segment]> {
        self.samples.get(sample_id).map(|s| s.as_slice())
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(|s| s.as_str())
    }

    pub fn load_error(&self, sample_id: &str) -> Option<&str> {
        self.load_errors.get(sample_id).map(|s| s.as_str())
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_segments(&self) -> usize {
        self.samples.values().map(|s| s.len()).sum()
    }
}

impl FromIterator<Segment> for SegmentTable {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        let mut table = SegmentTable::new();
        for segment in iter {
            table.push(segment);
        }
        table
    }
}

/// A sample that could not be called.
#[derive(Debug)]
pub struct SampleFailure {
    pub sample_id: String,
    pub error: CnBinError,
}

/// Per-bin tallies of each call across the called samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrequency<'a> {
    pub bin: &'a Bin,
    /// Counts aligned with [BinCall::ALL].
    pub counts: [usize; 5],
}

impl CallFrequency<'_> {
    pub fn count(&self, call: BinCall) -> usize {
        BinCall::ALL
            .iter()
            .position(|c| *c == call)
            .map_or(0, |i| self.counts[i])
    }
}

///
/// Calls of a whole cohort over one bin set.
///
#[derive(Debug)]
pub struct CohortCalls {
    pub bins: Vec<Bin>,
    pub samples: Vec<SampleCalls>,
    pub failures: Vec<SampleFailure>,
}

impl CohortCalls {
    pub fn sample_ids(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.sample_id.as_str()).collect()
    }

    pub fn get(&self, sample_id: &str) -> Option<&SampleCalls> {
        self.samples.iter().find(|s| s.sample_id == sample_id)
    }

    /// Long form: one `(sample, bin, call)` triple per sample and bin, sample-major.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Bin, BinCall)> {
        self.samples.iter().flat_map(move |sample| {
            self.bins
                .iter()
                .zip(sample.calls.iter())
                .map(move |(bin, call)| (sample.sample_id.as_str(), bin, *call))
        })
    }

    /// Wide form: one row per bin, one column per called sample.
    pub fn matrix(&self) -> Vec<Vec<BinCall>> {
        (0..self.bins.len())
            .map(|i| self.samples.iter().map(|s| s.calls[i]).collect())
            .collect()
    }

    pub fn frequencies(&self) -> Vec<CallFrequency<'_>> {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                let mut counts = [0usize; 5];
                for sample in &self.samples {
                    if let Some(slot) = BinCall::ALL.iter().position(|c| *c == sample.calls[i]) {
                        counts[slot] += 1;
                    }
                }
                CallFrequency { bin, counts }
            })
            .collect()
    }
}

///
/// Call every sample of `table` over `bins`, in parallel across samples.
///
/// Only invalid bins, uncallable regions or parameters fail the whole run. A sample that
/// fails validation is reported in [CohortCalls::failures] and the others are still called.
///
pub fn call_cohort(
    bins: Vec<Bin>,
    table: &SegmentTable,
    uncallable: &[Region],
    params: &CallParams,
) -> Result<CohortCalls> {
    call_cohort_inner(bins, table, uncallable, params, None)
}

/// [call_cohort], advancing `bar` once per finished sample.
pub fn call_cohort_with_progress(
    bins: Vec<Bin>,
    table: &SegmentTable,
    uncallable: &[Region],
    params: &CallParams,
    bar: &ProgressBar,
) -> Result<CohortCalls> {
    call_cohort_inner(bins, table, uncallable, params, Some(bar))
}

fn call_cohort_inner(
    bins: Vec<Bin>,
    table: &SegmentTable,
    uncallable: &[Region],
    params: &CallParams,
    bar: Option<&ProgressBar>,
) -> Result<CohortCalls> {
    params.validate()?;
    let mask = UncallableMask::new(&bins, uncallable)?;
    info!(
        "Calling {} samples over {} bins ({} segments, {} uncallable regions)",
        table.n_samples(),
        bins.len(),
        table.n_segments(),
        uncallable.len()
    );

    let sample_ids: Vec<&str> = table.sample_ids().collect();
    let results: Vec<std::result::Result<SampleCalls, SampleFailure>> = sample_ids
        .par_iter()
        .map(|&sample_id| {
            let result = match table.load_error(sample_id) {
                Some(reason) => Err(CnBinError::Parse(reason.to_string())),
                None => call_bin_status_with_mask(
                    sample_id,
                    &bins,
                    table.segments(sample_id).unwrap_or_default(),
                    &mask,
                    params,
                ),
            };
            if let Some(bar) = bar {
                bar.inc(1);
            }
            result.map_err(|error| SampleFailure {
                sample_id: sample_id.to_string(),
                error,
            })
        })
        .collect();

    let mut samples = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(calls) => samples.push(calls),
            Err(failure) => {
                warn!("Skipping sample {}: {}", failure.sample_id, failure.error);
                failures.push(failure);
            }
        }
    }

    Ok(CohortCalls {
        bins,
        samples,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnbin_core::models::{ChromSizes, CnStatus};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn segment(sample: &str, chr: &str, start: u32, end: u32, status: CnStatus) -> Segment {
        Segment::new(
            sample,
            Region {
                chr: chr.to_string(),
                start,
                end,
            },
            status,
        )
    }

    #[fixture]
    fn bins() -> Vec<Bin> {
        ChromSizes::from(vec![("chr1".to_string(), 2_000_000)])
            .tile(1_000_000, None)
            .unwrap()
    }

    #[fixture]
    fn table() -> SegmentTable {
        vec![
            segment("S2", "chr1", 0, 2_000_000, CnStatus::Loss),
            segment("S1", "chr1", 0, 1_000_000, CnStatus::Gain),
            segment("S3", "chr1", 500_000, 100_000, CnStatus::Gain),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    fn test_failed_sample_does_not_stop_cohort(bins: Vec<Bin>, table: SegmentTable) {
        let cohort = call_cohort(bins, &table, &[], &CallParams::default()).unwrap();

        assert_eq!(cohort.sample_ids(), vec!["S1", "S2"]);
        assert_eq!(cohort.failures.len(), 1);
        assert_eq!(cohort.failures[0].sample_id, "S3");
        assert!(matches!(cohort.failures[0].error, CnBinError::Validation(_)));

        assert_eq!(
            cohort.get("S1").unwrap().calls,
            vec![BinCall::Status(CnStatus::Gain), BinCall::Unstable]
        );
        assert_eq!(
            cohort.get("S2").unwrap().calls,
            vec![BinCall::Status(CnStatus::Loss), BinCall::Status(CnStatus::Loss)]
        );
    }

    #[rstest]
    fn test_load_error_fails_only_that_sample(bins: Vec<Bin>, mut table: SegmentTable) {
        table.add_load_error("S4", "bad start on line 7".to_string());
        let cohort = call_cohort(bins, &table, &[], &CallParams::default()).unwrap();

        let failed: Vec<&str> = cohort.failures.iter().map(|f| f.sample_id.as_str()).collect();
        assert_eq!(failed, vec!["S3", "S4"]);
        assert!(matches!(cohort.failures[1].error, CnBinError::Parse(_)));
        assert_eq!(cohort.samples.len(), 2);
    }

    #[rstest]
    fn test_sample_without_segments_is_unstable(bins: Vec<Bin>) {
        let mut table = SegmentTable::new();
        table.add_sample("S9");
        let cohort = call_cohort(bins, &table, &[], &CallParams::default()).unwrap();
        assert_eq!(
            cohort.get("S9").unwrap().calls,
            vec![BinCall::Unstable, BinCall::Unstable]
        );
    }

    #[rstest]
    fn test_rows_matrix_and_frequencies(bins: Vec<Bin>, table: SegmentTable) {
        let cohort = call_cohort(bins, &table, &[], &CallParams::default()).unwrap();

        let rows: Vec<(&str, usize, BinCall)> = cohort
            .rows()
            .map(|(sample, bin, call)| (sample, bin.index, call))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("S1", 0, BinCall::Status(CnStatus::Gain)),
                ("S1", 1, BinCall::Unstable),
                ("S2", 0, BinCall::Status(CnStatus::Loss)),
                ("S2", 1, BinCall::Status(CnStatus::Loss)),
            ]
        );

        assert_eq!(
            cohort.matrix(),
            vec![
                vec![BinCall::Status(CnStatus::Gain), BinCall::Status(CnStatus::Loss)],
                vec![BinCall::Unstable, BinCall::Status(CnStatus::Loss)],
            ]
        );

        let freqs = cohort.frequencies();
        assert_eq!(freqs[0].count(BinCall::Status(CnStatus::Gain)), 1);
        assert_eq!(freqs[0].count(BinCall::Status(CnStatus::Loss)), 1);
        assert_eq!(freqs[1].count(BinCall::Unstable), 1);
        assert_eq!(freqs[1].count(BinCall::Uncallable), 0);
    }

    #[rstest]
    fn test_invalid_params_fail_whole_run(bins: Vec<Bin>, table: SegmentTable) {
        let params = CallParams {
            frac_threshold: 2.0,
            ..CallParams::default()
        };
        assert!(matches!(
            call_cohort(bins, &table, &[], &params),
            Err(CnBinError::Configuration(_))
        ));
    }

    #[rstest]
    fn test_progress_bar_counts_samples(bins: Vec<Bin>, table: SegmentTable) {
        let bar = ProgressBar::hidden();
        call_cohort_with_progress(bins, &table, &[], &CallParams::default(), &bar).unwrap();
        assert_eq!(bar.position(), 3);
    }
}
