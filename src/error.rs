// File: src/error.rs
use crate::core::types::SpecialKind;
use std::io;
use thiserror::Error;

/// A surface string could not be decomposed into alphabet letters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("cannot parse an empty word")]
    EmptyInput,

    #[error("no alphabet letter matches at `{remainder}`")]
    NoMatchingLetter { remainder: String },
}

/// The letter table or a generation/selection setting is unusable.
///
/// These are raised while building a generator or selector, never while
/// generating, so a bad table fails at startup instead of mid-request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("malformed letter table: {0}")]
    MalformedTable(String),

    #[error("no letter can be generated at {position} after {after:?}")]
    EmptyCandidatePool {
        position: &'static str,
        after: Option<SpecialKind>,
    },

    #[error("invalid word length range {min}..={max}")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("invalid selection setting: {0}")]
    InvalidSelection(String),
}

/// Everything the engine and its store can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("config file error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
