//! Core data model for copy-number status calling over fixed-width genome bins.
//!
//! The crate holds the types every other `cnbin` crate shares:
//!
//! - [`Region`]: a half-open `[start, end)` interval on one chromosome
//! - [`Segment`]: a region of one sample annotated with a [`CnStatus`]
//! - [`Bin`]: one window of the genome partition, carrying its global index
//! - [`ChromSizes`]: the reference chromosome sizes used to tile the genome
//! - [`BinCall`]: the per-sample, per-bin result
//!
//! # Example
//!
//! ```
//! use cnbin_core::models::ChromSizes;
//!
//! let sizes = ChromSizes::from(vec![("chr1".to_string(), 2_500_000)]);
//! let bins = sizes.tile(1_000_000, None).unwrap();
//!
//! assert_eq!(bins.len(), 3);
//! assert_eq!(bins[2].region.width(), 500_000);
//! ```

pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{CnBinError, Result};
