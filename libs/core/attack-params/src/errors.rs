// [libs/core/attack-params/src/errors.rs]
//! Error taxonomy for attack-parameter validation and argv synthesis.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgBuildError {
    #[error("attack mode code {0} is not supported")]
    UnsupportedAttackMode(u32),

    #[error("dictionary attack requires exactly one wordlist")]
    DictionaryWordlistMissing,

    #[error("mask attack requires a mask or a mask list")]
    MaskMissing,

    #[error("mask attack cannot specify both a mask and a mask list")]
    MaskAndMaskListBothGiven,

    #[error("hybrid attack requires a mask")]
    HybridMaskMissing,

    #[error("hybrid attack requires a wordlist")]
    HybridWordlistMissing,

    #[error("at most 4 custom charsets are supported, got {0}")]
    TooManyCustomCharsets(usize),

    #[error("mask increment requires min <= max (min={min}, max={max})")]
    InvalidMaskIncrementRange { min: u32, max: u32 },

    #[error("path `{0}` escapes the configured base directory")]
    PathEscapesBase(PathBuf),

    #[error("resolved path `{0}` does not exist")]
    PathNotFound(PathBuf),

    #[error("io error resolving path: {0}")]
    Io(String),
}
