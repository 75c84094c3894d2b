// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod learning;
pub mod persistence;
pub mod selector;

pub use crate::config::EngineConfig;
pub use crate::core::engine::WordEngine;
pub use crate::core::parser::{is_valid_word, WordParser};
pub use crate::core::render::render;
pub use crate::core::samples::SampleSet;
pub use crate::core::types::ParsedWord;
pub use crate::error::{ConfigurationError, Error, ParseError};
pub use crate::learning::{PreferenceModel, Training};
