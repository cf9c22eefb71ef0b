use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cnbin_core::CnBinError;
use cnbin_core::models::BinCall;

use crate::calling::{CallParams, OverlapPolicy};

pub const DEFAULT_BIN_WIDTH: u32 = 1_000_000;

fn default_bin_width() -> u32 {
    DEFAULT_BIN_WIDTH
}

fn default_frac() -> f64 {
    0.75
}

///
/// Settings for one calling run, typically read from a TOML file:
///
/// ```toml
/// bin_width = 1000000
/// frac_threshold = 0.75
/// frac_uncallable = 0.75
/// overlap_policy = "additive"
/// chromosomes = ["chr1", "chr2"]
///
/// [labels]
/// gain = "Gain"
/// loss = "Loss"
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CallConfig {
    #[serde(default = "default_bin_width")]
    pub bin_width: u32,
    #[serde(default = "default_frac")]
    pub frac_threshold: f64,
    #[serde(default = "default_frac")]
    pub frac_uncallable: f64,
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
    /// Restrict tiling to these chromosomes, in this order.
    pub chromosomes: Option<Vec<String>>,
    /// Output label for each call name.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Default for CallConfig {
    fn default() -> Self {
        CallConfig {
            bin_width: DEFAULT_BIN_WIDTH,
            frac_threshold: default_frac(),
            frac_uncallable: default_frac(),
            overlap_policy: OverlapPolicy::default(),
            chromosomes: None,
            labels: HashMap::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CallConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] CnBinError),
}

pub type CallConfigResult<T> = std::result::Result<T, CallConfigError>;

impl TryFrom<&Path> for CallConfig {
    type Error = CallConfigError;

    fn try_from(path: &Path) -> CallConfigResult<Self> {
        let toml_str = read_to_string(path)?;
        let config: CallConfig = toml::from_str(&toml_str)?;
        config.params().validate()?;
        config.status_labels()?;
        Ok(config)
    }
}

impl CallConfig {
    pub fn params(&self) -> CallParams {
        CallParams {
            frac_threshold: self.frac_threshold,
            frac_uncallable: self.frac_uncallable,
            overlap_policy: self.overlap_policy,
        }
    }

    pub fn status_labels(&self) -> Result<StatusLabels, CnBinError> {
        StatusLabels::try_from(&self.labels)
    }
}

///
/// Output text for each [BinCall]. Defaults to the lowercase call names; any call can be
/// recoded, e.g. to match the labels a downstream plotting step expects.
///
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLabels {
    labels: [String; 5],
}

impl Default for StatusLabels {
    fn default() -> Self {
        StatusLabels {
            labels: BinCall::ALL.map(|call| call.as_str().to_string()),
        }
    }
}

impl StatusLabels {
    pub fn label(&self, call: BinCall) -> &str {
        let slot = BinCall::ALL
            .iter()
            .position(|c| *c == call)
            .unwrap_or_default();
        &self.labels[slot]
    }
}

impl TryFrom<&HashMap<String, String>> for StatusLabels {
    type Error = CnBinError;

    fn try_from(recode: &HashMap<String, String>) -> Result<Self, Self::Error> {
        let mut labels = StatusLabels::default();
        for (name, label) in recode {
            let call: BinCall = name.parse().map_err(|_| {
                CnBinError::Configuration(format!("cannot recode unknown call `{name}`"))
            })?;
            let slot = BinCall::ALL
                .iter()
                .position(|c| *c == call)
                .unwrap_or_default();
            labels.labels[slot] = label.clone();
        }
        Ok(labels)
    }
}
