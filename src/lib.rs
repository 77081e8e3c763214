//! Common functionality for agrisuit, a crop suitability engine for West Java.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod crop;
pub mod dataset;
pub mod error;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod practice;
pub mod range;
pub mod region;
pub mod report;
pub mod settings;
pub mod suitability;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// Falls back to the current directory if the platform has no config directory.
pub fn get_agrisuit_config_dir() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_default();
    dir.push("agrisuit");
    dir
}
