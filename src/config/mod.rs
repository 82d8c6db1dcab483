// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate and normalise it into a `ConfigFile` (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{CONFIG_PATH_ENV, default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, LoggingSection, RawConfigFile, RcloneSection, UploadSection};
pub use validate::normalize_extension;
