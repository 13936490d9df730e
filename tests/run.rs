//! Integration tests for the `run` command.
use pvecon::cli::{RunOpts, handle_run_command};
use pvecon::settings::Settings;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

/// Write a small project file to the given folder
fn write_project_file(dir: &Path) -> std::path::PathBuf {
    let file_path = dir.join("farm.toml");
    let mut file = File::create(&file_path).unwrap();
    write!(
        file,
        "lifetime = 10
fit_years = 10
nominal_power = 500.0
installation_cost = 500000.0
start_year = 2020
"
    )
    .unwrap();

    file_path
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("PVECON_LOG_LEVEL", "off") };

    let project_dir = tempdir().unwrap();
    let project_file = write_project_file(project_dir.path());

    {
        // Save results to non-existent directory to check that directory creation works
        let tempdir = tempdir().unwrap();
        let output_dir = tempdir.path().join("results");
        let opts = RunOpts {
            output_dir: Some(output_dir.clone()),
            ..RunOpts::default()
        };
        handle_run_command(Some(&project_file), &opts, Some(Settings::default())).unwrap();

        let cash_flows = fs::read_to_string(output_dir.join("yearly_cash_flows.csv")).unwrap();
        assert_eq!(cash_flows.lines().count(), 12); // header, year zero and ten project years
        assert!(cash_flows.contains(",2020-01-01,"));
        assert!(cash_flows.contains(",2030-01-01,"));

        let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
        assert!(summary.contains("return_on_investment,N.A."));
    }

    // Second time will fail because the logging is already initialised
    let opts = RunOpts {
        output_dir: Some(tempdir().unwrap().path().to_path_buf()),
        ..RunOpts::default()
    };
    assert_eq!(
        handle_run_command(Some(&project_file), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
