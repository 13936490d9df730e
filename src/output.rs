//! The module responsible for presenting results and writing output data to disk.
use crate::appraisal::ProjectAppraisal;
use crate::lcoe::LcoeOutcome;
use crate::units::{Energy, Money};
use anyhow::{Context, Result, ensure};
use itertools::izip;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which project-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "pvecon_results";

/// Output folder name used when no project file was given
const DEFAULT_PROJECT_NAME: &str = "default";

/// The output file name for yearly cash flows
const YEARLY_CASH_FLOWS_FILE_NAME: &str = "yearly_cash_flows.csv";

/// The output file name for the summary metrics
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// Displayed in place of metrics which are not calculated
const NOT_AVAILABLE: &str = "N.A.";

/// Get the default output folder for a project
pub fn get_output_dir(project_file: Option<&Path>) -> Result<PathBuf> {
    let project_name = match project_file {
        Some(path) => path
            .file_stem()
            .context("Project file has no name")?
            .to_str()
            .context("Invalid chars in project file name")?,
        None => DEFAULT_PROJECT_NAME,
    };

    Ok([OUTPUT_DIRECTORY_ROOT, project_name].iter().collect())
}

/// Create a new output directory, optionally overwriting an existing one.
///
/// # Returns
///
/// True if an existing directory with contents was deleted, false otherwise, or an error if the
/// directory is not empty and `overwrite` is false.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    let mut overwritten = false;
    if output_dir.is_dir() {
        if output_dir.read_dir()?.next().is_none() {
            // already exists and is empty
            return Ok(false);
        }

        ensure!(
            overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        overwritten = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwritten)
}

/// Represents a row of the yearly cash flows CSV file
#[derive(Serialize, Debug, PartialEq)]
struct CashFlowRow {
    year: u32,
    date: String,
    energy: Energy,
    revenue: Money,
    insurance: Money,
    maintenance: Money,
    net_earnings: Money,
    discounted_net_earnings: Money,
}

/// Represents a row of the summary CSV file
#[derive(Serialize, Debug, PartialEq)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

/// Generate the rows of the yearly cash flows file, starting with the investment in year zero
fn cash_flow_rows(appraisal: &ProjectAppraisal) -> Vec<CashFlowRow> {
    let yearly = izip!(
        appraisal.energy.iter_years(),
        appraisal.revenue.iter(),
        appraisal.insurance_costs.iter(),
        appraisal.maintenance_costs.iter(),
    );
    let mut dated = appraisal
        .cash_flows
        .iter()
        .zip(appraisal.discounted_cash_flows.iter().copied());

    let mut rows = Vec::with_capacity(appraisal.cash_flows.len());
    if let Some((investment, discounted)) = dated.next() {
        rows.push(CashFlowRow {
            year: 0,
            date: investment.date.to_string(),
            energy: Energy(0.0),
            revenue: Money(0.0),
            insurance: Money(0.0),
            maintenance: Money(0.0),
            net_earnings: investment.amount,
            discounted_net_earnings: discounted,
        });
    }

    for (((year, energy), revenue, insurance, maintenance), (flow, discounted)) in
        yearly.zip(dated)
    {
        rows.push(CashFlowRow {
            year,
            date: flow.date.to_string(),
            energy,
            revenue,
            insurance,
            maintenance,
            net_earnings: flow.amount,
            discounted_net_earnings: discounted,
        });
    }

    rows
}

/// Describe the outcome of the LCOE search
fn format_lcoe(lcoe: &LcoeOutcome) -> String {
    format!("{:.6}", lcoe.lcoe().value())
}

/// Format the return on investment as a percentage
fn format_return_on_investment(appraisal: &ProjectAppraisal) -> String {
    appraisal.return_on_investment().map_or_else(
        || NOT_AVAILABLE.to_string(),
        |roi| format!("{:.2}", roi.value() * 100.0),
    )
}

/// Generate the rows of the summary file
fn summary_rows(appraisal: &ProjectAppraisal) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            metric: "nominal_power",
            value: appraisal.nominal_power.value().to_string(),
        },
        SummaryRow {
            metric: "present_value_of_net_income",
            value: format!("{:.2}", appraisal.present_value_of_net_income.value()),
        },
        SummaryRow {
            metric: "lcoe",
            value: format_lcoe(&appraisal.lcoe),
        },
        SummaryRow {
            metric: "lcoe_converged",
            value: appraisal.lcoe.is_converged().to_string(),
        },
        SummaryRow {
            metric: "lcoe_iterations",
            value: appraisal.lcoe.iterations().to_string(),
        },
        SummaryRow {
            metric: "return_on_investment",
            value: format_return_on_investment(appraisal),
        },
        SummaryRow {
            metric: "npv",
            value: format!("{:.2}", appraisal.npv.value()),
        },
    ]
}

/// Format the results of an appraisal for display to the user
pub fn format_summary(appraisal: &ProjectAppraisal) -> String {
    let mut lines = vec![
        format!("Nominal Power (kWp): {}", appraisal.nominal_power.value()),
        format!(
            "Present Value of Net Income (€): {:.2}",
            appraisal.present_value_of_net_income.value()
        ),
        format!(
            "Levelised Costs of Electricity \"LCOE\" (€/kWh): {}",
            format_lcoe(&appraisal.lcoe)
        ),
    ];
    if let LcoeOutcome::Exhausted { iterations, .. } = appraisal.lcoe {
        lines.push(format!(
            "(LCOE search did not converge after {iterations} iterations)"
        ));
    }
    lines.push(format!(
        "Return on Investment (%): {}",
        format_return_on_investment(appraisal)
    ));
    lines.push(format!("NPV (€): {:.2}", appraisal.npv.value()));

    lines.into_iter().map(|line| line + "\n").collect()
}

/// Write a series of rows to a CSV file
fn write_csv<T: Serialize>(file_path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the results of an appraisal to CSV files in the given folder
pub fn write_results(output_dir: &Path, appraisal: &ProjectAppraisal) -> Result<()> {
    write_csv(
        &output_dir.join(YEARLY_CASH_FLOWS_FILE_NAME),
        &cash_flow_rows(appraisal),
    )?;
    write_csv(&output_dir.join(SUMMARY_FILE_NAME), &summary_rows(appraisal))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::appraise;
    use crate::fixture::{assert_error, break_even_parameters};
    use crate::parameters::ProjectParameters;
    use crate::units::MoneyPerEnergy;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use tempfile::tempdir;

    #[fixture]
    fn appraisal(break_even_parameters: ProjectParameters) -> ProjectAppraisal {
        let params = ProjectParameters {
            installation_cost: Money(900.0),
            ..break_even_parameters
        };
        appraise(&params, 2023).unwrap()
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        BufReader::new(file).lines().map_while(Result::ok).collect()
    }

    #[test]
    fn test_get_output_dir() {
        assert_eq!(
            get_output_dir(Some(Path::new("projects/farm.toml"))).unwrap(),
            PathBuf::from("pvecon_results/farm")
        );
        assert_eq!(
            get_output_dir(None).unwrap(),
            PathBuf::from("pvecon_results/default")
        );
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");

        // New directory
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing empty directory
        assert!(!create_output_directory(&output_dir, false).unwrap());

        // Existing directory with contents
        File::create(output_dir.join("file.txt")).unwrap();
        assert_error!(
            create_output_directory(&output_dir, false),
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );
        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(output_dir.read_dir().unwrap().next().is_none());
    }

    #[rstest]
    fn test_format_summary(appraisal: ProjectAppraisal) {
        assert_eq!(
            format_summary(&appraisal),
            "Nominal Power (kWp): 100\n\
            Present Value of Net Income (€): 1000.00\n\
            Levelised Costs of Electricity \"LCOE\" (€/kWh): 0.090000\n\
            Return on Investment (%): N.A.\n\
            NPV (€): 100.00\n"
        );
    }

    #[rstest]
    fn test_format_summary_not_converged(mut appraisal: ProjectAppraisal) {
        appraisal.lcoe = LcoeOutcome::Exhausted {
            lcoe: MoneyPerEnergy(0.5),
            iterations: 10,
        };
        let summary = format_summary(&appraisal);
        assert!(summary.contains(
            "(€/kWh): 0.500000\n(LCOE search did not converge after 10 iterations)\n"
        ));
    }

    #[rstest]
    fn test_cash_flow_rows(appraisal: ProjectAppraisal) {
        let rows = cash_flow_rows(&appraisal);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 0);
        assert_eq!(rows[0].date, "2023-01-01");
        assert_eq!(rows[0].net_earnings, Money(-900.0));
        assert_eq!(rows[1].year, 1);
        assert_eq!(rows[1].date, "2024-01-01");
        assert_eq!(rows[1].energy, Energy(10_000.0));
    }

    #[rstest]
    fn test_write_results(appraisal: ProjectAppraisal) {
        let dir = tempdir().unwrap();
        write_results(dir.path(), &appraisal).unwrap();

        let lines = read_lines(&dir.path().join(YEARLY_CASH_FLOWS_FILE_NAME));
        assert_eq!(
            lines[0],
            "year,date,energy,revenue,insurance,maintenance,net_earnings,discounted_net_earnings"
        );
        assert_eq!(lines.len(), 3);

        let lines = read_lines(&dir.path().join(SUMMARY_FILE_NAME));
        assert_eq!(lines[0], "metric,value");
        assert!(lines.contains(&"return_on_investment,N.A.".to_string()));
        assert!(lines.contains(&"npv,100.00".to_string()));
        assert!(lines.contains(&"lcoe_converged,true".to_string()));
        assert!(lines.contains(&format!("lcoe_iterations,{}", appraisal.lcoe.iterations())));
    }

    #[rstest]
    fn test_write_results_not_converged(mut appraisal: ProjectAppraisal) {
        appraisal.lcoe = LcoeOutcome::Exhausted {
            lcoe: MoneyPerEnergy(0.5),
            iterations: 10,
        };
        let dir = tempdir().unwrap();
        write_results(dir.path(), &appraisal).unwrap();

        let lines = read_lines(&dir.path().join(SUMMARY_FILE_NAME));
        assert!(lines.contains(&"lcoe_converged,false".to_string()));
        assert!(lines.contains(&"lcoe_iterations,10".to_string()));
    }
}
