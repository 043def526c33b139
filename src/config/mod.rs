// src/config/mod.rs

//! Configuration loading and validation for ktalk.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate values and turn duration strings into `Duration`s (`validate.rs`).
//!
//! Every value has a default, so running without any config file is the
//! normal case.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use validate::nonzero_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, ExecutorSection, ExecutorSettings, GeneratorSection, GeneratorSettings,
    RawConfigFile, ValidatorSection,
};
