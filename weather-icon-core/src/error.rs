use thiserror::Error;

use crate::day_phase::NightFlag;
use crate::features::{CloudCategory, PrecipCategory, WindCategory};

/// Errors surfaced by a classification call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Field '{field}' is not finite or out of range ({value})")]
    InvalidValue { field: String, value: f64 },

    #[error("Invalid astronomy data: {0}")]
    InvalidAstronomy(String),

    /// The icon table had no entry for a feature tuple. The built-in table is
    /// exhaustive, so reaching this is a bug rather than a runtime condition.
    #[error(
        "No icon for precipitation={precipitation}, clouds={clouds}, wind={wind}, night={night}"
    )]
    UnsupportedCombination {
        precipitation: PrecipCategory,
        clouds: CloudCategory,
        wind: WindCategory,
        night: NightFlag,
    },

    #[error("Unusable payload: {0}")]
    Payload(String),
}

/// Errors raised while building a bucket scale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("Scale '{0}' has no buckets")]
    Empty(String),

    #[error("Scale '{name}' bucket {index} has an upper bound that is not finite")]
    NonFiniteBound { name: String, index: usize },

    #[error("Scale '{name}' bucket {index} does not ascend from the previous bound")]
    NotAscending { name: String, index: usize },

    #[error("Scale '{name}' bucket {index} is unbounded but is not the last bucket")]
    UnboundedBeforeEnd { name: String, index: usize },

    #[error("Scale '{0}' must end with an unbounded bucket")]
    BoundedTail(String),
}
