//! The command line interface for the program.
use crate::appraisal::appraise;
use crate::log;
use crate::output::{create_output_directory, format_summary, get_output_dir, write_results};
use crate::parameters::ProjectParameters;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Calendar year in which the installation cost is paid [default: last year]
    #[arg(long)]
    pub start_year: Option<i32>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Appraise a PV project.
    Run {
        /// Path to the project file. If omitted, the default parameters are used.
        project_file: Option<PathBuf>,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a project file.
    Validate {
        /// Path to the project file.
        project_file: PathBuf,
    },
    /// Print a project file containing the default parameters.
    Defaults,
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { project_file, opts } => {
                handle_run_command(project_file.as_deref(), &opts, None)
            }
            Self::Validate { project_file } => handle_validate_command(&project_file, None),
            Self::Defaults => handle_defaults_command(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ pvecon --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// The year in which the installation cost is paid.
///
/// The command-line option takes precedence over the project file. If neither gives a year, the
/// year before `current_year` is used.
fn resolve_start_year(cli: Option<i32>, file: Option<i32>, current_year: i32) -> i32 {
    cli.or(file).unwrap_or(current_year - 1)
}

/// Load project parameters from a file, or use the defaults if no file is given
fn load_parameters(project_file: Option<&Path>) -> Result<ProjectParameters> {
    let Some(project_file) = project_file else {
        info!("No project file given; using default parameters");
        return Ok(ProjectParameters::default());
    };

    let params = ProjectParameters::from_path(project_file)?;
    info!("Loaded project from {}", project_file.display());

    Ok(params)
}

/// Handle the `run` command.
pub fn handle_run_command(
    project_file: Option<&Path>,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(project_file)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path)).context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let params = load_parameters(project_file).context("Failed to load project.")?;
    let start_year = resolve_start_year(opts.start_year, params.start_year, Local::now().year());
    info!("Investment year: {start_year}");

    let appraisal = appraise(&params, start_year).context("Failed to appraise project.")?;
    print!("{}", format_summary(&appraisal));

    write_results(output_path, &appraisal).context("Failed to write results.")?;
    info!("Results written to {}", output_path.display());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(project_file: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the project
    load_parameters(Some(project_file)).context("Failed to validate project.")?;
    info!("Project validation successful!");

    Ok(())
}

/// Handle the `defaults` command.
pub fn handle_defaults_command() -> Result<()> {
    print!("{}", ProjectParameters::default_file_contents()?);

    Ok(())
}
