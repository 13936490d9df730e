//! Values indexed by project year and the elementwise operations on them.
use crate::units::Money;
use anyhow::{Result, ensure};
use itertools::izip;

/// One value per project year.
///
/// Years are numbered from 1, so the first element of the series is the value for year 1. Series
/// which are combined elementwise must have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySeries<T>(Vec<T>);

impl<T: Copy> YearlySeries<T> {
    /// Number of project years covered by the series
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series contains no years
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value for the given project year (1-indexed)
    pub fn get(&self, year: u32) -> Option<T> {
        let index = usize::try_from(year).ok()?.checked_sub(1)?;
        self.0.get(index).copied()
    }

    /// Iterate over the values in year order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.0.iter().copied()
    }

    /// Iterate over `(year, value)` pairs, with years starting at 1
    pub fn iter_years(&self) -> impl Iterator<Item = (u32, T)> + '_ {
        (1..).zip(self.iter())
    }

    /// The values as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> FromIterator<T> for YearlySeries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for YearlySeries<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

/// Sum revenue and the two cost series into net earnings for each year.
///
/// Costs are expected to be negative already, so the series are simply added together.
///
/// # Returns
///
/// The net earnings per year, or an error if the series are of different lengths.
pub fn net_earnings(
    revenue: &YearlySeries<Money>,
    insurance_costs: &YearlySeries<Money>,
    maintenance_costs: &YearlySeries<Money>,
) -> Result<YearlySeries<Money>> {
    ensure!(
        revenue.len() == insurance_costs.len() && revenue.len() == maintenance_costs.len(),
        "Yearly series have different lengths (revenue: {}, insurance: {}, maintenance: {})",
        revenue.len(),
        insurance_costs.len(),
        maintenance_costs.len()
    );

    Ok(
        izip!(revenue.iter(), insurance_costs.iter(), maintenance_costs.iter())
            .map(|(revenue, insurance, maintenance)| revenue + insurance + maintenance)
            .collect(),
    )
}
