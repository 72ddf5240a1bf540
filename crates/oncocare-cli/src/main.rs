use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use oncocare_cli::commands::{self, OutputFormat};
use oncocare_cli::config::{self, OncoConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oncocare", version)]
#[command(about = "Generate prompts from oncology patient records and score answers")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory of `<patient id>.json` records
    #[arg(long, global = true)]
    records_dir: Option<PathBuf>,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct RecordArgs {
    /// Patient record JSON file
    #[arg(long)]
    record: Option<PathBuf>,
    /// Patient id to look up in the records directory
    #[arg(long)]
    patient_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract prompt/answer pairs from a patient record
    Generate {
        #[command(flatten)]
        target: RecordArgs,
        /// Data model specification (defaults to the built-in one)
        #[arg(long)]
        spec: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Score produced answers against those extracted from a record
    Evaluate {
        #[command(flatten)]
        target: RecordArgs,
        /// Data model specification (defaults to the built-in one)
        #[arg(long)]
        spec: Option<PathBuf>,
        /// JSON array of produced `{prompt, answer}` pairs
        #[arg(long)]
        answers: PathBuf,
        /// List the outcome of every prompt
        #[arg(long)]
        report: bool,
    },
    /// Print the parsed data model specification
    ShowSpec {
        #[arg(long)]
        spec: Option<PathBuf>,
    },
    /// Write a config file with default values
    InitConfig {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::InitConfig { .. } => OncoConfig::default(),
        _ => config::load_or_default(cli.config.as_deref())?,
    };

    init_tracing(&config.log_filter, cli.log_json);

    let records_dir = cli.records_dir.or_else(|| config.records_dir.clone());

    match cli.command {
        Commands::Generate {
            target,
            spec,
            format,
        } => {
            let spec = commands::load_specification(
                spec.or_else(|| config.specification_path.clone()).as_deref(),
            )?;
            let record = commands::resolve_record(
                target.record.as_deref(),
                target.patient_id.as_deref(),
                records_dir.as_deref(),
                &config.details_key,
            )?;
            let pairs = oncocare_extract::generate(&spec, &record);
            println!("{}", commands::render_pairs(&pairs, format)?);
        }
        Commands::Evaluate {
            target,
            spec,
            answers,
            report,
        } => {
            let spec = commands::load_specification(
                spec.or_else(|| config.specification_path.clone()).as_deref(),
            )?;
            let record = commands::resolve_record(
                target.record.as_deref(),
                target.patient_id.as_deref(),
                records_dir.as_deref(),
                &config.details_key,
            )?;
            let expected = oncocare_extract::generate(&spec, &record);
            let produced = commands::load_answers(&answers)?;
            let evaluation = oncocare_eval::evaluate_report(&expected, &produced)?;
            println!("{}", commands::render_evaluation(&evaluation, report));
        }
        Commands::ShowSpec { spec } => {
            let spec = commands::load_specification(
                spec.or_else(|| config.specification_path.clone()).as_deref(),
            )?;
            println!("{}", commands::render_specification(&spec)?);
        }
        Commands::InitConfig { force } => {
            let path = commands::init_config(cli.config.as_deref(), force)?;
            println!("Wrote config to {}", path.display());
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
