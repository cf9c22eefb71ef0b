pub mod bin;
pub mod chrom_sizes;
pub mod interval;
pub mod region;
pub mod segment;
pub mod status;

// re-export for cleaner imports
pub use self::bin::Bin;
pub use self::chrom_sizes::ChromSizes;
pub use self::interval::Interval;
pub use self::region::Region;
pub use self::segment::Segment;
pub use self::status::{BinCall, CnStatus};
