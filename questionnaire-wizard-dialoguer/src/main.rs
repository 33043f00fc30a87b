//! Run the supplier selection questionnaire in the terminal.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use questionnaire::{GroupReset, GroupSelection, Questionnaire, Session};
use questionnaire_store::StorageBackend;
use questionnaire_wizard_dialoguer::{AppConfig, DialoguerDriver, DialoguerError};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Which release of the study to run.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Version {
    /// Pages 1-3 (Q1 to Q7)
    Pilot,
    /// Pages 1-5 (Q1 to Q14)
    Full,
}

impl Version {
    fn questionnaire(self) -> Questionnaire {
        match self {
            Self::Pilot => example_questionnaires::pilot(),
            Self::Full => example_questionnaires::full(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Group {
    Random,
    A,
    B,
}

impl From<Group> for GroupSelection {
    fn from(group: Group) -> Self {
        match group {
            Group::Random => Self::Random,
            Group::A => Self::A,
            Group::B => Self::B,
        }
    }
}

/// Collect questionnaire responses page by page
///
/// Examples:
///   questionnaire --survey pilot
///   questionnaire --config survey.toml --group b
///   questionnaire --backend csv --directory responses
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE", env = "QUESTIONNAIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Which release of the study to run
    #[arg(long = "survey", value_enum, default_value = "full")]
    survey: Version,

    /// Force a variant instead of the configured selection
    #[arg(long, value_enum)]
    group: Option<Group>,

    /// Choose the variant again for every respondent
    #[arg(long)]
    reroll: bool,

    /// Storage format (overrides the config file)
    #[arg(long, value_name = "FORMAT")]
    backend: Option<StorageBackend>,

    /// Storage directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Disable colored prompts
    #[arg(long)]
    plain: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(group) = args.group {
        config.session.group_selection = group.into();
    }
    if args.reroll {
        config.session.group_on_reset = GroupReset::Reroll;
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    if let Some(directory) = &args.directory {
        config.storage.directory = directory.clone();
    }

    let questionnaire = args.survey.questionnaire();
    let sink = config.storage.open();
    info!(
        survey = questionnaire.name(),
        backend = %config.storage.backend,
        directory = %config.storage.directory.display(),
        "questionnaire ready"
    );

    let driver = if args.plain {
        DialoguerDriver::plain()
    } else {
        DialoguerDriver::new()
    };
    let mut session = Session::start(&questionnaire, config.session.clone())
        .context("Failed to start the questionnaire")?;

    loop {
        match driver.run(&mut session, sink.as_ref()) {
            Ok(record) => info!(table = %record.partition_key(), "response saved"),
            Err(DialoguerError::Cancelled) => {
                println!("Cancelled.");
                return Ok(());
            }
            Err(err) => return Err(err).context("Questionnaire failed"),
        }

        match driver.confirm("Start another response?") {
            Ok(true) => continue,
            Ok(false) | Err(DialoguerError::Cancelled) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
