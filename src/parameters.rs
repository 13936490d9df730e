//! Defines the `ProjectParameters` struct, which represents the contents of a project file.
use crate::input::{input_err_msg, read_toml};
use crate::revenue::RevenuePeriod;
use crate::units::{Capacity, Dimensionless, EnergyPerCapacity, Money, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

const DEFAULT_PROJECT_FILE_HEADER: &str = "# Parameters for a PV project appraisal
# Rates are given as fractions, e.g. 0.02 for 2%
";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_lifetime, u32, 20);
define_unit_param_default!(default_nominal_power, Capacity, 110_000.0);
define_unit_param_default!(default_annual_yield, EnergyPerCapacity, 102.6);
define_unit_param_default!(default_degradation_rate, Dimensionless, 0.003);
define_param_default!(default_fit_years, u32, 20);
define_unit_param_default!(default_price_per_kwh, MoneyPerEnergy, 0.15);
define_unit_param_default!(default_index_rate, Dimensionless, 0.0);
define_unit_param_default!(default_installation_cost, Money, 50_000_000.0);
define_unit_param_default!(default_insurance_rate, Dimensionless, 0.00138);
define_unit_param_default!(default_maintenance_rate, Dimensionless, 0.027);
define_unit_param_default!(default_inflation_rate, Dimensionless, 0.02);
define_unit_param_default!(default_discount_rate, Dimensionless, 0.04);
define_unit_param_default!(default_lcoe_tolerance, Money, 1e-6);
define_param_default!(default_lcoe_max_iterations, u32, 100_000);
define_unit_param_default!(default_lcoe_initial_step, MoneyPerEnergy, 0.01);

/// Represents the contents of a project file.
///
/// Every parameter is optional and missing parameters take their default values.
#[derive(Debug, Clone, PartialEq, DocumentedFields, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectParameters {
    /// Project lifetime (years)
    #[serde(default = "default_lifetime")]
    pub lifetime: u32,
    /// Nominal power of the installation (kWp)
    #[serde(default = "default_nominal_power")]
    pub nominal_power: Capacity,
    /// Energy produced per kWp in the first year (kWh/kWp)
    #[serde(default = "default_annual_yield")]
    pub annual_yield: EnergyPerCapacity,
    /// Yearly loss of output as a fraction of the first year's output
    #[serde(default = "default_degradation_rate")]
    pub degradation_rate: Dimensionless,
    /// Number of years for which the feed-in tariff is paid
    #[serde(default = "default_fit_years")]
    pub fit_years: u32,
    /// Feed-in tariff (EUR/kWh)
    #[serde(default = "default_price_per_kwh")]
    pub price_per_kwh: MoneyPerEnergy,
    /// Yearly escalation of the tariff
    #[serde(default = "default_index_rate")]
    pub index_rate: Dimensionless,
    /// Total installation cost (EUR)
    #[serde(default = "default_installation_cost")]
    pub installation_cost: Money,
    /// Yearly insurance premium as a fraction of the installation cost
    #[serde(default = "default_insurance_rate")]
    pub insurance_rate: Dimensionless,
    /// Yearly maintenance cost as a fraction of the installation cost
    #[serde(default = "default_maintenance_rate")]
    pub maintenance_rate: Dimensionless,
    /// Yearly inflation applied to insurance and maintenance costs
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: Dimensionless,
    /// Yearly discount rate used for the NPV
    #[serde(default = "default_discount_rate")]
    pub discount_rate: Dimensionless,
    /// Years in which energy is sold: `lifetime` (ignores `fit_years`) or `fit_only`
    #[serde(default)]
    pub revenue_period: RevenuePeriod,
    /// Calendar year in which the installation cost is paid (defaults to last year)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    /// Largest acceptable difference between discounted income and installation cost (EUR)
    #[serde(default = "default_lcoe_tolerance")]
    pub lcoe_tolerance: Money,
    /// Maximum number of iterations for the LCOE search
    #[serde(default = "default_lcoe_max_iterations")]
    pub lcoe_max_iterations: u32,
    /// Initial price step for the LCOE search (EUR/kWh)
    #[serde(default = "default_lcoe_initial_step")]
    pub lcoe_initial_step: MoneyPerEnergy,
}

impl Default for ProjectParameters {
    fn default() -> Self {
        Self {
            lifetime: default_lifetime(),
            nominal_power: default_nominal_power(),
            annual_yield: default_annual_yield(),
            degradation_rate: default_degradation_rate(),
            fit_years: default_fit_years(),
            price_per_kwh: default_price_per_kwh(),
            index_rate: default_index_rate(),
            installation_cost: default_installation_cost(),
            insurance_rate: default_insurance_rate(),
            maintenance_rate: default_maintenance_rate(),
            inflation_rate: default_inflation_rate(),
            discount_rate: default_discount_rate(),
            revenue_period: RevenuePeriod::default(),
            start_year: None,
            lcoe_tolerance: default_lcoe_tolerance(),
            lcoe_max_iterations: default_lcoe_max_iterations(),
            lcoe_initial_step: default_lcoe_initial_step(),
        }
    }
}

/// Check that a parameter is finite and strictly positive
fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a parameter is a proportion in the range [0, 1)
fn check_proportion(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        (0.0..1.0).contains(&value.value()),
        "{name} must be at least zero and less than one"
    );

    Ok(())
}

/// Check that a yearly growth or discount rate is valid
fn check_rate(name: &str, value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value > Dimensionless(-1.0),
        "{name} must be a finite number greater than -1"
    );

    Ok(())
}

/// Check that the `fit_years` parameter is valid
fn check_fit_years(fit_years: u32, lifetime: u32) -> Result<()> {
    ensure!(
        fit_years <= lifetime,
        "fit_years ({fit_years}) cannot be greater than lifetime ({lifetime})"
    );

    Ok(())
}

impl ProjectParameters {
    /// Read a project file from the specified path.
    ///
    /// # Returns
    ///
    /// The file contents as a [`ProjectParameters`] struct or an error if the file is invalid
    pub fn from_path(file_path: &Path) -> Result<ProjectParameters> {
        let params: ProjectParameters = read_toml(file_path)?;
        params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(params)
    }

    /// Check that all parameters are within their valid domains, logging a warning if energy
    /// production goes negative before the end of the project
    pub fn validate(&self) -> Result<()> {
        self.check_values()?;
        if let Some(warning) = self.degradation_warning() {
            warn!("{warning}");
        }

        Ok(())
    }

    /// Check that all parameters are within their valid domains without logging anything
    pub fn check_values(&self) -> Result<()> {
        ensure!(self.lifetime >= 1, "lifetime must be at least one year");
        check_positive("nominal_power", self.nominal_power.value())?;
        check_positive("annual_yield", self.annual_yield.value())?;
        check_proportion("degradation_rate", self.degradation_rate)?;
        check_fit_years(self.fit_years, self.lifetime)?;
        check_positive("price_per_kwh", self.price_per_kwh.value())?;
        check_rate("index_rate", self.index_rate)?;
        check_positive("installation_cost", self.installation_cost.value())?;
        check_proportion("insurance_rate", self.insurance_rate)?;
        check_proportion("maintenance_rate", self.maintenance_rate)?;
        check_rate("inflation_rate", self.inflation_rate)?;
        check_rate("discount_rate", self.discount_rate)?;
        check_positive("lcoe_tolerance", self.lcoe_tolerance.value())?;
        ensure!(
            self.lcoe_max_iterations > 0,
            "lcoe_max_iterations cannot be zero"
        );
        check_positive("lcoe_initial_step", self.lcoe_initial_step.value())?;

        Ok(())
    }

    /// A warning message if total degradation over the lifetime exceeds 100%
    fn degradation_warning(&self) -> Option<String> {
        let total_degradation = self.degradation_rate.value() * f64::from(self.lifetime - 1);
        (total_degradation > 1.0).then(|| {
            format!(
                "Total degradation over the project lifetime is {:.0}%, so energy production \
                will be negative in the final years",
                total_degradation * 100.0
            )
        })
    }

    /// The contents of a project file containing the default parameters, with documentation
    pub fn default_file_contents() -> Result<String> {
        let params_raw = toml::to_string(&ProjectParameters::default())
            .context("Could not convert parameters to TOML")?;

        let mut out = DEFAULT_PROJECT_FILE_HEADER.to_string();
        for line in params_raw.lines() {
            if let Some(last) = line.find('=') {
                let field = line[..last].trim();
                write_field_docs(&mut out, field)?;
                writeln!(&mut out, "{}", line.trim())?;
            }
        }

        // Optional parameters without a default value are left commented out
        write_field_docs(&mut out, "start_year")?;
        writeln!(&mut out, "# start_year = 2025")?;

        Ok(out)
    }
}

/// Write the doc comment for a field as TOML comments
fn write_field_docs(out: &mut String, field: &str) -> Result<()> {
    let docs = ProjectParameters::get_field_docs(field)
        .ok()
        .with_context(|| format!("Missing doc comment for field {field}"))?;
    for line in docs.lines() {
        write!(out, "\n# {}\n", line.trim())?;
    }

    Ok(())
}
