use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use cnbin_core::models::{Bin, BinCall, CnStatus, Region, Segment};
use cnbin_core::{CnBinError, Result};
use cnbin_overlaprs::ChromIndex;

use crate::coverage::{base_pairs_in_index, coverage_fraction};

/// How overlapping same-status segments of one sample contribute to a bin's coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Every segment counts in full; overlaps are counted more than once.
    #[default]
    Additive,
    /// Same-status segments are unioned first, so no status exceeds the bin width.
    Merge,
}

impl Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Additive => f.write_str("additive"),
            OverlapPolicy::Merge => f.write_str("merge"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = CnBinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "additive" => Ok(OverlapPolicy::Additive),
            "merge" => Ok(OverlapPolicy::Merge),
            _ => Err(CnBinError::Configuration(format!(
                "unknown overlap policy `{s}`, expected `additive` or `merge`"
            ))),
        }
    }
}

/// Thresholds for turning coverage fractions into a [BinCall].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    /// Minimum fraction of the bin the dominant status must cover.
    pub frac_threshold: f64,
    /// A bin whose uncallable fraction exceeds this is `uncallable`.
    pub frac_uncallable: f64,
    pub overlap_policy: OverlapPolicy,
}

impl Default for CallParams {
    fn default() -> Self {
        CallParams {
            frac_threshold: 0.75,
            frac_uncallable: 0.75,
            overlap_policy: OverlapPolicy::Additive,
        }
    }
}

impl CallParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("frac_threshold", self.frac_threshold),
            ("frac_uncallable", self.frac_uncallable),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CnBinError::Configuration(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

///
/// Uncallable fraction of every bin. It depends only on the bins and the uncallable
/// regions, so it is computed once and shared by every sample.
///
#[derive(Debug, Clone)]
pub struct UncallableMask {
    fractions: Vec<f64>,
}

impl UncallableMask {
    pub fn new(bins: &[Bin], uncallable: &[Region]) -> Result<Self> {
        for bin in bins {
            bin.region.validate()?;
            if bin.width() == 0 {
                return Err(CnBinError::Configuration(format!("{bin} has zero width")));
            }
        }
        for region in uncallable {
            region.validate()?;
        }

        let index: ChromIndex<()> = uncallable.iter().map(|r| (r, ())).collect();
        let fractions = bins
            .iter()
            .map(|bin| coverage_fraction(&bin.region, base_pairs_in_index(&bin.region, &index)))
            .collect();

        Ok(UncallableMask { fractions })
    }

    /// Uncallable fraction of the bin at position `i` of the bin slice.
    pub fn fraction(&self, i: usize) -> f64 {
        self.fractions[i]
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

/// The calls of one sample, in bin order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCalls {
    pub sample_id: String,
    pub calls: Vec<BinCall>,
}

///
/// Call every bin for one sample.
///
/// Segments belonging to other samples are ignored. Every segment of the sample is
/// validated before any bin is called; one malformed segment fails the whole sample.
///
/// # Arguments
/// - sample_id: the sample to call
/// - bins: the genome partition; calls come back in this order
/// - segments: copy-number segments, filtered to `sample_id`
/// - uncallable: sample-independent uncallable regions
/// - params: thresholds and overlap policy
pub fn call_bin_status(
    sample_id: &str,
    bins: &[Bin],
    segments: &[Segment],
    uncallable: &[Region],
    params: &CallParams,
) -> Result<SampleCalls> {
    params.validate()?;
    let mask = UncallableMask::new(bins, uncallable)?;
    call_bin_status_with_mask(sample_id, bins, segments, &mask, params)
}

/// [call_bin_status] with a precomputed [UncallableMask] for `bins`.
pub fn call_bin_status_with_mask(
    sample_id: &str,
    bins: &[Bin],
    segments: &[Segment],
    mask: &UncallableMask,
    params: &CallParams,
) -> Result<SampleCalls> {
    if mask.len() != bins.len() {
        return Err(CnBinError::Configuration(format!(
            "uncallable mask covers {} bins, expected {}",
            mask.len(),
            bins.len()
        )));
    }

    let own: Vec<&Segment> = segments
        .iter()
        .filter(|s| s.sample_id == sample_id)
        .collect();
    for segment in &own {
        segment.validate()?;
    }

    let by_status = index_by_status(&own, params.overlap_policy);
    debug!(
        "Sample {}: {} segments, statuses {:?}",
        sample_id,
        own.len(),
        by_status.keys().collect::<Vec<_>>()
    );

    let calls = bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            if mask.fraction(i) > params.frac_uncallable {
                return BinCall::Uncallable;
            }
            let coverage: BTreeMap<CnStatus, f64> = by_status
                .iter()
                .map(|(status, index)| {
                    let bp = base_pairs_in_index(&bin.region, index);
                    (*status, coverage_fraction(&bin.region, bp))
                })
                .collect();
            dominant_call(&coverage, params.frac_threshold)
        })
        .collect();

    Ok(SampleCalls {
        sample_id: sample_id.to_string(),
        calls,
    })
}

fn index_by_status(segments: &[&Segment], policy: OverlapPolicy) -> BTreeMap<CnStatus, ChromIndex<()>> {
    let mut grouped: BTreeMap<CnStatus, Vec<&Region>> = BTreeMap::new();
    for segment in segments {
        grouped.entry(segment.status).or_default().push(&segment.region);
    }

    grouped
        .into_iter()
        .map(|(status, regions)| {
            let index: ChromIndex<()> = regions.into_iter().map(|r| (r, ())).collect();
            let index = match policy {
                OverlapPolicy::Additive => index,
                OverlapPolicy::Merge => index.merge_overlaps(),
            };
            (status, index)
        })
        .collect()
}

///
/// Pick the status with the largest coverage fraction. Exact ties go to the status
/// listed first in [CnStatus::TIE_PRIORITY]. A status with zero coverage never wins.
///
pub fn dominant_call(coverage: &BTreeMap<CnStatus, f64>, frac_threshold: f64) -> BinCall {
    let mut best: Option<(CnStatus, f64)> = None;
    for status in CnStatus::TIE_PRIORITY {
        if let Some(&frac) = coverage.get(&status) {
            if best.is_none_or(|(_, top)| frac > top) {
                best = Some((status, frac));
            }
        }
    }

    match best {
        Some((status, frac)) if frac > 0.0 && frac >= frac_threshold => BinCall::Status(status),
        _ => BinCall::Unstable,
    }
}
