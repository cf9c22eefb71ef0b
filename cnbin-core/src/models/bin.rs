use std::fmt::{self, Display};

use crate::models::Region;

///
/// One window of the genome partition. `index` is the position of the bin in the
/// genome-wide ordering and is what output tables are keyed on.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bin {
    pub index: usize,
    pub region: Region,
}

impl Bin {
    pub fn chr(&self) -> &str {
        &self.region.chr
    }

    pub fn width(&self) -> u32 {
        self.region.width()
    }
}

impl Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bin {} ({})", self.index, self.region)
    }
}
