//! Yearly energy production of a PV installation.
use crate::series::YearlySeries;
use crate::units::{Capacity, Dimensionless, Energy, EnergyPerCapacity};

/// Calculate the energy produced in each year of the project lifetime.
///
/// Degradation is linear in the number of whole years elapsed since the first year, i.e. the
/// output in year `y` is `nominal_power * annual_yield * (1 - degradation_rate * (y - 1))`.
///
/// Values are not clamped: if `degradation_rate * (lifetime - 1) > 1` then production in the last
/// years is negative.
///
/// # Arguments
///
/// * `nominal_power` - Peak capacity of the installation
/// * `annual_yield` - Energy produced per unit of capacity in the first year
/// * `degradation_rate` - Loss of output per year, as a fraction of the first year's output
/// * `lifetime` - Number of years in the project
pub fn annual_energy_production(
    nominal_power: Capacity,
    annual_yield: EnergyPerCapacity,
    degradation_rate: Dimensionless,
    lifetime: u32,
) -> YearlySeries<Energy> {
    let first_year = nominal_power * annual_yield;
    (1..=lifetime)
        .map(|year| {
            let elapsed = Dimensionless(f64::from(year - 1));
            (Dimensionless(1.0) - degradation_rate * elapsed) * first_year
        })
        .collect()
}
