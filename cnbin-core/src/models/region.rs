use std::fmt::{self, Display};

use crate::errors::{CnBinError, Result};

///
/// A half-open `[start, end)` interval on one chromosome, 0-based like BED.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Region {
    ///
    /// Build a region, rejecting intervals whose end lies before their start.
    ///
    pub fn try_new(chr: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        let region = Region {
            chr: chr.into(),
            start,
            end,
        };
        region.validate()?;
        Ok(region)
    }

    ///
    /// Fail with [CnBinError::Validation] when `end < start`.
    ///
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(CnBinError::Validation(format!(
                "{}:{}-{} ends before it starts",
                self.chr, self.start, self.end
            )));
        }
        Ok(())
    }

    ///
    /// Number of base pairs covered. Zero for malformed regions.
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    ///
    /// Base pairs shared with `other`; zero on different chromosomes.
    ///
    pub fn overlap_len(&self, other: &Region) -> u32 {
        if self.chr != other.chr {
            return 0;
        }
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }

    ///
    /// Get the BED line for this region
    ///
    pub fn as_string(&self) -> String {
        format!("{}\t{}\t{}", self.chr, self.start, self.end)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_try_new_rejects_inverted_interval() {
        let result = Region::try_new("chr1", 100, 50);
        assert!(matches!(result, Err(CnBinError::Validation(_))));
    }

    #[rstest]
    fn test_try_new_accepts_empty_interval() {
        let region = Region::try_new("chr1", 100, 100).unwrap();
        assert_eq!(region.width(), 0);
    }

    #[rstest]
    #[case(("chr1", 0, 100), ("chr1", 50, 150), 50)]
    #[case(("chr1", 0, 100), ("chr1", 100, 150), 0)]
    #[case(("chr1", 0, 100), ("chr2", 0, 100), 0)]
    #[case(("chr1", 10, 20), ("chr1", 0, 100), 10)]
    fn test_overlap_len(
        #[case] a: (&str, u32, u32),
        #[case] b: (&str, u32, u32),
        #[case] expected: u32,
    ) {
        let a = Region::try_new(a.0, a.1, a.2).unwrap();
        let b = Region::try_new(b.0, b.1, b.2).unwrap();
        assert_eq!(a.overlap_len(&b), expected);
        assert_eq!(b.overlap_len(&a), expected);
    }

    #[rstest]
    fn test_display_and_bed_string() {
        let region = Region::try_new("chr7", 5, 10).unwrap();
        assert_eq!(region.to_string(), "chr7:5-10");
        assert_eq!(region.as_string(), "chr7\t5\t10");
    }
}
