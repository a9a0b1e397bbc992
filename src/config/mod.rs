// src/config/mod.rs

//! Configuration loading and validation for handoff.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a config file from disk, JSON or TOML (`loader.rs`).
//! - Validate watch items and actions into a [`RunConfig`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    Action, Condition, ConditionSpec, RawActionItem, RawConfigFile, RawWatchItem, RunConfig,
    DEFAULT_LOG_ENCODING,
};
