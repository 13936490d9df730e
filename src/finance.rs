//! General functions related to finance: discounting of dated cash flows and project NPV.
use crate::series::YearlySeries;
use crate::units::{Dimensionless, Money};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Number of days in a year for the purposes of discounting
const DAYS_PER_YEAR: f64 = 365.0;

/// An amount of money paid or received on a particular date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// When the cash flow occurs
    pub date: NaiveDate,
    /// Positive for income, negative for expenditure
    pub amount: Money,
}

/// Discount each cash flow to the earliest date in the series.
///
/// Each amount is divided by `(1 + discount_rate)^(d / 365)`, where `d` is the number of days
/// between its date and the earliest date. The cash flows need not be sorted and the output is in
/// the same order as the input.
pub fn discounted_cash_flows(
    discount_rate: Dimensionless,
    cash_flows: &[CashFlow],
) -> Vec<Money> {
    let Some(min_date) = cash_flows.iter().map(|flow| flow.date).min() else {
        return Vec::new();
    };

    let base = Dimensionless(1.0) + discount_rate;
    cash_flows
        .iter()
        .map(|flow| flow.amount / base.powf(years_between(min_date, flow.date)))
        .collect()
}

/// Calculates the net present value of non-periodic cash flows (XNPV).
///
/// Returns zero for an empty series.
pub fn xnpv(discount_rate: Dimensionless, cash_flows: &[CashFlow]) -> Money {
    discounted_cash_flows(discount_rate, cash_flows)
        .into_iter()
        .sum()
}

/// Fractional number of years between two dates, using 365-day years
#[allow(clippy::cast_precision_loss)]
fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// First of January of the given year
fn new_years_day(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).with_context(|| format!("Invalid calendar year: {year}"))
}

/// Construct the dated cash flows for a project.
///
/// The first entry is the installation cost, paid on 1 January of `start_year`. It is followed by
/// the earnings for each project year, received on 1 January of each subsequent year.
pub fn project_cash_flows(
    earnings: &YearlySeries<Money>,
    installation_cost: Money,
    start_year: i32,
) -> Result<Vec<CashFlow>> {
    let investment = CashFlow {
        date: new_years_day(start_year)?,
        amount: -installation_cost,
    };

    let mut cash_flows = Vec::with_capacity(earnings.len() + 1);
    cash_flows.push(investment);
    for (offset, amount) in (1..).zip(earnings.iter()) {
        let year = start_year
            .checked_add(offset)
            .context("Project extends beyond the supported calendar range")?;
        cash_flows.push(CashFlow {
            date: new_years_day(year)?,
            amount,
        });
    }

    Ok(cash_flows)
}

/// Calculates the NPV of the project, including the initial investment.
///
/// # Arguments
///
/// * `earnings` - Net earnings for each project year
/// * `discount_rate` - Yearly discount rate
/// * `installation_cost` - Up-front investment, as a positive amount
/// * `start_year` - Calendar year in which the investment is made
pub fn project_npv(
    earnings: &YearlySeries<Money>,
    discount_rate: Dimensionless,
    installation_cost: Money,
    start_year: i32,
) -> Result<Money> {
    let cash_flows = project_cash_flows(earnings, installation_cost, start_year)?;
    Ok(xnpv(discount_rate, &cash_flows))
}

/// The discounted value of the project's net income, i.e. the NPV excluding the investment
pub fn present_value_of_net_income(npv: Money, installation_cost: Money) -> Money {
    npv + installation_cost
}
