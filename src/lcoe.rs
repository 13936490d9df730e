//! Search for the levelised cost of electricity (LCOE).
//!
//! The LCOE is the tariff at which the discounted net income of the project exactly pays back the
//! installation cost, i.e. the price at which the NPV is zero.
use crate::cost::annual_costs;
use crate::energy::annual_energy_production;
use crate::finance::{present_value_of_net_income, project_npv};
use crate::parameters::ProjectParameters;
use crate::revenue::fit_revenue;
use crate::series::net_earnings;
use crate::units::{Dimensionless, Money, MoneyPerEnergy};
use anyhow::Result;
use log::{debug, trace, warn};

/// The result of the LCOE search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LcoeOutcome {
    /// Discounted net income matched the installation cost within the tolerance
    Converged {
        /// The break-even price
        lcoe: MoneyPerEnergy,
        /// Number of times the cash flows were evaluated
        iterations: u32,
    },
    /// The iteration limit was reached first
    Exhausted {
        /// The last price tried
        lcoe: MoneyPerEnergy,
        /// Number of times the cash flows were evaluated
        iterations: u32,
    },
}

impl LcoeOutcome {
    /// The break-even price, or the best estimate of it if the search did not converge
    pub fn lcoe(&self) -> MoneyPerEnergy {
        match self {
            Self::Converged { lcoe, .. } | Self::Exhausted { lcoe, .. } => *lcoe,
        }
    }

    /// Number of iterations the search ran for
    pub fn iterations(&self) -> u32 {
        match self {
            Self::Converged { iterations, .. } | Self::Exhausted { iterations, .. } => *iterations,
        }
    }

    /// Whether the search converged
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Find the LCOE for a project.
///
/// Starting from the project's tariff, the price is raised by a fixed step while the discounted
/// net income is below the installation cost. Whenever it overshoots, the price is lowered by the
/// step and the step is halved. The search stops once the difference is within
/// `lcoe_tolerance` or after `lcoe_max_iterations` evaluations; in the latter case the last price
/// is returned as [`LcoeOutcome::Exhausted`].
///
/// # Arguments
///
/// * `params` - Project parameters. `price_per_kwh` is used as the initial guess.
/// * `start_year` - Calendar year in which the installation cost is paid
pub fn find_lcoe(params: &ProjectParameters, start_year: i32) -> Result<LcoeOutcome> {
    params.check_values()?;
    search_lcoe(params, start_year)
}

/// Run the LCOE search for parameters which have already been validated
pub(crate) fn search_lcoe(params: &ProjectParameters, start_year: i32) -> Result<LcoeOutcome> {
    // Only revenue depends on the price, so the other series are the same for every iteration
    let production = annual_energy_production(
        params.nominal_power,
        params.annual_yield,
        params.degradation_rate,
        params.lifetime,
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

    let net_income_at = |price: MoneyPerEnergy| -> Result<Money> {
        let revenue = fit_revenue(
            &production,
            price,
            params.fit_years,
            params.index_rate,
            params.revenue_period,
        );
        let earnings = net_earnings(&revenue, &insurance_costs, &maintenance_costs)?;
        let npv = project_npv(
            &earnings,
            params.discount_rate,
            params.installation_cost,
            start_year,
        )?;
        Ok(present_value_of_net_income(npv, params.installation_cost))
    };

    let mut guess = params.price_per_kwh;
    let mut step = params.lcoe_initial_step;
    for iteration in 1..=params.lcoe_max_iterations {
        let shortfall = params.installation_cost - net_income_at(guess)?;
        trace!(
            "LCOE iteration {iteration}: price {}, shortfall {}",
            guess.value(),
            shortfall.value()
        );

        if shortfall.abs() <= params.lcoe_tolerance {
            debug!(
                "LCOE search converged to {} after {iteration} iterations",
                guess.value()
            );
            return Ok(LcoeOutcome::Converged {
                lcoe: guess,
                iterations: iteration,
            });
        }

        if shortfall > Money(0.0) {
            guess += step;
        } else {
            guess -= step;
            step = step / Dimensionless(2.0);
        }
    }

    warn!(
        "LCOE search did not converge after {} iterations; using last estimate of {}",
        params.lcoe_max_iterations,
        guess.value()
    );
    Ok(LcoeOutcome::Exhausted {
        lcoe: guess,
        iterations: params.lcoe_max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, break_even_parameters};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    const START_YEAR: i32 = 2023;

    #[rstest]
    fn test_find_lcoe_at_break_even(break_even_parameters: ProjectParameters) {
        let outcome = find_lcoe(&break_even_parameters, START_YEAR).unwrap();
        assert_eq!(
            outcome,
            LcoeOutcome::Converged {
                lcoe: MoneyPerEnergy(0.1),
                iterations: 1
            }
        );
    }

    #[rstest]
    #[case(0.05)]
    #[case(0.1)]
    #[case(0.11)]
    #[case(0.115)]
    fn test_find_lcoe_from_initial_price(
        break_even_parameters: ProjectParameters,
        #[case] initial_price: f64,
    ) {
        let params = ProjectParameters {
            price_per_kwh: MoneyPerEnergy(initial_price),
            ..break_even_parameters
        };
        let outcome = find_lcoe(&params, START_YEAR).unwrap();
        assert!(outcome.is_converged());
        assert_approx_eq!(
            MoneyPerEnergy,
            outcome.lcoe(),
            MoneyPerEnergy(0.1),
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_find_lcoe_overshoot(break_even_parameters: ProjectParameters) {
        // Break-even price is 0.09, so the first step down hits it
        let params = ProjectParameters {
            installation_cost: Money(900.0),
            ..break_even_parameters
        };
        let outcome = find_lcoe(&params, START_YEAR).unwrap();
        assert!(outcome.is_converged());
        assert_eq!(outcome.iterations(), 2);
        assert_approx_eq!(
            MoneyPerEnergy,
            outcome.lcoe(),
            MoneyPerEnergy(0.09),
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_find_lcoe_exhausted(break_even_parameters: ProjectParameters) {
        let params = ProjectParameters {
            price_per_kwh: MoneyPerEnergy(0.2),
            lcoe_max_iterations: 1,
            ..break_even_parameters
        };
        let outcome = find_lcoe(&params, START_YEAR).unwrap();
        assert!(!outcome.is_converged());
        assert_eq!(outcome.iterations(), 1);
        assert_approx_eq!(
            MoneyPerEnergy,
            outcome.lcoe(),
            MoneyPerEnergy(0.19),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_find_lcoe_default_parameters() {
        let params = ProjectParameters::default();
        let outcome = find_lcoe(&params, START_YEAR).unwrap();
        let lcoe = outcome.lcoe().value();
        assert!(lcoe > 0.3 && lcoe < 0.7, "Unexpected LCOE: {lcoe}");
    }

    #[rstest]
    fn test_find_lcoe_cannot_fall_more_than_twice_the_step(
        break_even_parameters: ProjectParameters,
    ) {
        // The step is halved on every overshoot, so the price can only ever fall by less than
        // twice the initial step in total
        let params = ProjectParameters {
            price_per_kwh: MoneyPerEnergy(0.2),
            lcoe_max_iterations: 200,
            ..break_even_parameters
        };
        let outcome = find_lcoe(&params, START_YEAR).unwrap();
        assert_eq!(
            outcome,
            LcoeOutcome::Exhausted {
                lcoe: outcome.lcoe(),
                iterations: 200
            }
        );
        assert_approx_eq!(
            MoneyPerEnergy,
            outcome.lcoe(),
            MoneyPerEnergy(0.18),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_find_lcoe_is_repeatable() {
        let params = ProjectParameters::default();
        assert_eq!(
            find_lcoe(&params, START_YEAR).unwrap(),
            find_lcoe(&params, START_YEAR).unwrap()
        );
    }

    #[rstest]
    fn test_find_lcoe_invalid_parameters(break_even_parameters: ProjectParameters) {
        let params = ProjectParameters {
            installation_cost: Money(-1.0),
            ..break_even_parameters
        };
        assert_error!(
            find_lcoe(&params, START_YEAR),
            "installation_cost must be a finite number greater than zero"
        );
    }
}
