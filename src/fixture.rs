//! Fixtures for tests

use crate::parameters::ProjectParameters;
use crate::units::{Capacity, Dimensionless, EnergyPerCapacity, Money, MoneyPerEnergy};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A one-year project whose earnings exactly pay back the installation cost.
///
/// 100 kWp producing 100 kWh/kWp sells 10,000 kWh at 0.10 EUR/kWh, with no costs, discounting or
/// indexation.
#[fixture]
pub fn break_even_parameters() -> ProjectParameters {
    ProjectParameters {
        lifetime: 1,
        nominal_power: Capacity(100.0),
        annual_yield: EnergyPerCapacity(100.0),
        degradation_rate: Dimensionless(0.0),
        fit_years: 1,
        price_per_kwh: MoneyPerEnergy(0.1),
        index_rate: Dimensionless(0.0),
        installation_cost: Money(1000.0),
        insurance_rate: Dimensionless(0.0),
        maintenance_rate: Dimensionless(0.0),
        inflation_rate: Dimensionless(0.0),
        discount_rate: Dimensionless(0.0),
        ..ProjectParameters::default()
    }
}
