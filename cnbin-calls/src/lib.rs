//! Copy-number status calls over fixed-width genome bins.
//!
//! For every sample and every bin, the fraction of the bin covered by each copy-number
//! status is computed from the sample's segments. A bin is called:
//!
//! - `uncallable` when more than `frac_uncallable` of it lies in uncallable regions
//! - the dominant status when that status covers at least `frac_threshold` of it
//! - `unstable` otherwise
//!
//! # Example
//!
//! ```
//! use cnbin_calls::{CallParams, call_bin_status};
//! use cnbin_core::models::{BinCall, ChromSizes, CnStatus, Region, Segment};
//!
//! let bins = ChromSizes::from(vec![("chr1".to_string(), 1_000_000)])
//!     .tile(1_000_000, None)
//!     .unwrap();
//! let segments = vec![Segment::new(
//!     "S1",
//!     Region::try_new("chr1", 0, 900_000).unwrap(),
//!     CnStatus::Gain,
//! )];
//!
//! let calls = call_bin_status("S1", &bins, &segments, &[], &CallParams::default()).unwrap();
//! assert_eq!(calls.calls, vec![BinCall::Status(CnStatus::Gain)]);
//! ```

pub mod calling;
pub mod cohort;
pub mod config;
pub mod coverage;
pub mod io;

// re-exports
pub use calling::{CallParams, OverlapPolicy, SampleCalls, UncallableMask, call_bin_status};
pub use cohort::{CohortCalls, SampleFailure, SegmentTable, call_cohort};
pub use config::{CallConfig, StatusLabels};
pub use coverage::base_pairs_per_bin;
