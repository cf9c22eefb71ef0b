//! Interval indexing for bin coverage queries.
//!
//! Coverage of a bin only ever involves intervals on the bin's own chromosome, so intervals
//! are grouped by chromosome into a [`ChromIndex`] before any overlap computation. Each
//! chromosome holds a [`SortedIntervals`] list answering `find_iter(start, end)` queries.
//!
//! ```rust
//! use cnbin_overlaprs::ChromIndex;
//! use cnbin_core::models::Region;
//!
//! let regions = vec![
//!     Region { chr: "chr1".to_string(), start: 100, end: 200 },
//!     Region { chr: "chr2".to_string(), start: 100, end: 200 },
//! ];
//! let index: ChromIndex<()> = regions.iter().map(|r| (r, ())).collect();
//!
//! let hits: Vec<_> = index.find_iter("chr1", 150, 300).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(index.find_iter("chr3", 0, 1000).count(), 0);
//! ```

/// Per-chromosome grouping of intervals.
pub mod chrom_index;

/// Sorted single-chromosome interval list.
pub mod sorted_intervals;

/// Core traits for overlap operations.
pub mod traits;

// re-exports
pub use self::chrom_index::ChromIndex;
pub use self::sorted_intervals::SortedIntervals;
pub use self::traits::{Interval, Overlapper};
