//! Revenue from selling energy under a feed-in tariff (FIT).
use crate::series::YearlySeries;
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// The years of the project in which energy is sold
#[derive(
    Debug, Clone, Copy, Default, PartialEq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum,
)]
pub enum RevenuePeriod {
    /// Revenue is earned for the whole project lifetime, irrespective of the FIT duration
    #[default]
    #[string = "lifetime"]
    Lifetime,
    /// Revenue is only earned while the tariff is paid
    #[string = "fit_only"]
    FitOnly,
}

/// Calculate the revenue from the tariff for every year of the project.
///
/// The price for year `y` is `price * (1 + index_rate)^y`, i.e. indexation already applies in the
/// first year.
///
/// # Arguments
///
/// * `production` - Energy sold in each year
/// * `price` - Base tariff
/// * `fit_years` - Number of years for which the tariff is paid
/// * `index_rate` - Yearly escalation of the tariff
/// * `revenue_period` - Whether `fit_years` limits the years in which revenue is earned
pub fn fit_revenue(
    production: &YearlySeries<Energy>,
    price: MoneyPerEnergy,
    fit_years: u32,
    index_rate: Dimensionless,
    revenue_period: RevenuePeriod,
) -> YearlySeries<Money> {
    let escalation = Dimensionless(1.0) + index_rate;
    production
        .iter_years()
        .map(|(year, energy)| {
            if revenue_period == RevenuePeriod::FitOnly && year > fit_years {
                return Money(0.0);
            }

            escalation.powf(f64::from(year)) * (energy * price)
        })
        .collect()
}
