use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CnBinError;

/// Copy-number status of a segment relative to the sample's ploidy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CnStatus {
    Loss,
    Neutral,
    Gain,
}

impl CnStatus {
    /// Order in which statuses win a coverage tie: loss, then gain, then neutral.
    pub const TIE_PRIORITY: [CnStatus; 3] = [CnStatus::Loss, CnStatus::Gain, CnStatus::Neutral];

    /// Derive the status by comparing a copy number to the baseline ploidy.
    ///
    /// ```
    /// use cnbin_core::models::CnStatus;
    ///
    /// assert_eq!(CnStatus::from_copy_number(1.0, 2.0), Some(CnStatus::Loss));
    /// assert_eq!(CnStatus::from_copy_number(3.0, 3.0), Some(CnStatus::Neutral));
    /// assert_eq!(CnStatus::from_copy_number(f64::NAN, 2.0), None);
    /// ```
    pub fn from_copy_number(copy_number: f64, ploidy: f64) -> Option<CnStatus> {
        match copy_number.partial_cmp(&ploidy)? {
            std::cmp::Ordering::Less => Some(CnStatus::Loss),
            std::cmp::Ordering::Greater => Some(CnStatus::Gain),
            std::cmp::Ordering::Equal => Some(CnStatus::Neutral),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CnStatus::Loss => "loss",
            CnStatus::Neutral => "neutral",
            CnStatus::Gain => "gain",
        }
    }
}

impl Display for CnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CnStatus {
    type Err = CnBinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loss" => Ok(CnStatus::Loss),
            "neutral" => Ok(CnStatus::Neutral),
            "gain" => Ok(CnStatus::Gain),
            _ => Err(CnBinError::Parse(format!("copy-number status: {s}"))),
        }
    }
}

///
/// The consensus call for one sample in one bin.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub enum BinCall {
    /// One status covers at least the threshold fraction of the bin.
    Status(CnStatus),
    /// No status reaches the threshold.
    Unstable,
    /// Too much of the bin lies in uncallable regions.
    Uncallable,
}

impl BinCall {
    /// Every call, in the order used for frequency tables.
    pub const ALL: [BinCall; 5] = [
        BinCall::Status(CnStatus::Loss),
        BinCall::Status(CnStatus::Neutral),
        BinCall::Status(CnStatus::Gain),
        BinCall::Unstable,
        BinCall::Uncallable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinCall::Status(status) => status.as_str(),
            BinCall::Unstable => "unstable",
            BinCall::Uncallable => "uncallable",
        }
    }

    pub fn status(&self) -> Option<CnStatus> {
        match self {
            BinCall::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl Display for BinCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinCall {
    type Err = CnBinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unstable" => Ok(BinCall::Unstable),
            "uncallable" => Ok(BinCall::Uncallable),
            other => other
                .parse::<CnStatus>()
                .map(BinCall::Status)
                .map_err(|_| CnBinError::Parse(format!("bin call: {s}"))),
        }
    }
}

impl From<CnStatus> for BinCall {
    fn from(status: CnStatus) -> Self {
        BinCall::Status(status)
    }
}

impl From<BinCall> for String {
    fn from(call: BinCall) -> Self {
        call.as_str().to_string()
    }
}

impl TryFrom<String> for BinCall {
    type Error = CnBinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
