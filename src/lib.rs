//! Economic appraisal of solar photovoltaic projects.
//!
//! Calculates yearly energy yield, feed-in tariff revenue, operating costs, NPV and the levelised
//! cost of electricity (LCOE) for a PV installation.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod appraisal;
pub mod cli;
pub mod cost;
pub mod energy;
pub mod finance;
pub mod input;
pub mod lcoe;
pub mod log;
pub mod output;
pub mod parameters;
pub mod revenue;
pub mod series;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config directory for the program, if the platform has one
pub fn get_pvecon_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pvecon"))
}
