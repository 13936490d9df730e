//! Yearly operating costs, such as insurance and maintenance.
use crate::series::YearlySeries;
use crate::units::{Dimensionless, Money};

/// Calculate a yearly cost which is a fixed proportion of some base cost, escalated by inflation.
///
/// Costs are returned as negative values so that they can be added directly to revenue. The cost
/// for year `y` is `-rate * base_cost * (1 + inflation_rate)^(y - 1)`.
pub fn annual_costs(
    rate: Dimensionless,
    base_cost: Money,
    inflation_rate: Dimensionless,
    lifetime: u32,
) -> YearlySeries<Money> {
    let first_year = -(rate * base_cost);
    let escalation = Dimensionless(1.0) + inflation_rate;
    (1..=lifetime)
        .map(|year| escalation.powf(f64::from(year - 1)) * first_year)
        .collect()
}
