//! Economic appraisal of a whole PV project.
use crate::cost::annual_costs;
use crate::energy::annual_energy_production;
use crate::finance::{
    CashFlow, discounted_cash_flows, present_value_of_net_income, project_cash_flows, xnpv,
};
use crate::lcoe::{LcoeOutcome, search_lcoe};
use crate::parameters::ProjectParameters;
use crate::revenue::fit_revenue;
use crate::series::{YearlySeries, net_earnings};
use crate::units::{Capacity, Dimensionless, Energy, Money};
use anyhow::Result;
use log::info;

/// The results of appraising a project at its tariff
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAppraisal {
    /// Nominal power of the installation
    pub nominal_power: Capacity,
    /// Energy produced in each year
    pub energy: YearlySeries<Energy>,
    /// Tariff revenue in each year
    pub revenue: YearlySeries<Money>,
    /// Insurance premiums in each year (negative)
    pub insurance_costs: YearlySeries<Money>,
    /// Maintenance costs in each year (negative)
    pub maintenance_costs: YearlySeries<Money>,
    /// Sum of revenue and costs in each year
    pub net_earnings: YearlySeries<Money>,
    /// Dated cash flows, starting with the installation cost
    pub cash_flows: Vec<CashFlow>,
    /// Each cash flow discounted to the date of the investment
    pub discounted_cash_flows: Vec<Money>,
    /// Net present value of the project
    pub npv: Money,
    /// Discounted net income, i.e. the NPV excluding the installation cost
    pub present_value_of_net_income: Money,
    /// The break-even tariff
    pub lcoe: LcoeOutcome,
}

impl ProjectAppraisal {
    /// Return on investment. This is not calculated yet.
    #[allow(clippy::unused_self)]
    pub fn return_on_investment(&self) -> Option<Dimensionless> {
        None
    }
}

/// Appraise a project.
///
/// # Arguments
///
/// * `params` - Project parameters
/// * `start_year` - Calendar year in which the installation cost is paid
///
/// # Returns
///
/// The appraisal, or an error if the parameters are invalid. Warnings about valid but unusual
/// parameters are left to [`ProjectParameters::validate`].
pub fn appraise(params: &ProjectParameters, start_year: i32) -> Result<ProjectAppraisal> {
    params.check_values()?;

    let energy = annual_energy_production(
        params.nominal_power,
        params.annual_yield,
        params.degradation_rate,
        params.lifetime,
    );
    let revenue = fit_revenue(
        &energy,
        params.price_per_kwh,
        params.fit_years,
        params.index_rate,
        params.revenue_period,
    );
    let insurance_costs = annual_costs(
        params.insurance_rate,
        params.installation_cost,
        params.inflation_rate,
        params.lifetime,
    );
    let maintenance_costs = annual_costs(
        params.maintenance_rate,
        params.installation_cost,
        params.inflation_rate,
        params.lifetime,
    );
    let net_earnings = net_earnings(&revenue, &insurance_costs, &maintenance_costs)?;

    let cash_flows = project_cash_flows(&net_earnings, params.installation_cost, start_year)?;
    let discounted_cash_flows = discounted_cash_flows(params.discount_rate, &cash_flows);
    let npv = xnpv(params.discount_rate, &cash_flows);
    info!("Project NPV: {:.2}", npv.value());

    let lcoe = search_lcoe(params, start_year)?;
    info!("LCOE: {:.6}", lcoe.lcoe().value());

    Ok(ProjectAppraisal {
        nominal_power: params.nominal_power,
        energy,
        revenue,
        insurance_costs,
        maintenance_costs,
        net_earnings,
        cash_flows,
        discounted_cash_flows,
        npv,
        present_value_of_net_income: present_value_of_net_income(npv, params.installation_cost),
        lcoe,
    })
}
