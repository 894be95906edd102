//! stocatima - Stocard to Catima loyalty card migration
//!
//! This crate provides the core functionality for the `stocatima` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Default paths and run configuration
//! - [`storage`] - Read-only SQLite access to the synced resource store
//! - [`model`] - Card and provider documents
//! - [`migrate`] - Card resolution, deduplication and the pipeline driver
//! - [`color`] - Dominant color of provider logos
//! - [`export`] - `catima.csv` and asset files
//! - [`package`] - ZIP packaging
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod migrate;
pub mod model;
pub mod package;
pub mod storage;

pub use error::{Error, Result};
pub use migrate::{MigrationStats, run};
