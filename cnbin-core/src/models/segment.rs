use crate::errors::Result;
use crate::models::{CnStatus, Region};

///
/// A called copy-number interval of one sample.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub sample_id: String,
    pub region: Region,
    pub status: CnStatus,
}

impl Segment {
    pub fn new(sample_id: impl Into<String>, region: Region, status: CnStatus) -> Self {
        Segment {
            sample_id: sample_id.into(),
            region,
            status,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate()
    }
}
