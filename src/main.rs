// Command-line access to early stopping tracker files.
// All tracking logic lives in the library (src/lib.rs and its modules).
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use qspr_epochs::{
    AggregateFunction, EarlyStopping, EarlyStoppingConfig, EarlyStoppingError, EarlyStoppingMode,
};

#[derive(Parser)]
#[command(name = "qspr-epochs", version, about = "Inspect and edit early stopping tracker files")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a tracker file, optionally from a JSON configuration
    Init {
        file: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Replace an existing tracker file and its recorded epochs
        #[arg(long)]
        force: bool,
    },
    /// Print the recorded epochs, mode and aggregate
    Show { file: PathBuf },
    /// Append epoch counts to the record
    Record {
        file: PathBuf,
        #[arg(required = true)]
        epochs: Vec<usize>,
    },
    /// Switch mode (RECORDING, NOT_RECORDING, FIXED, OPTIMAL)
    Mode { file: PathBuf, mode: String },
    /// Switch the aggregate function (mean, median, min, max)
    Aggregate { file: PathBuf, name: String },
    /// Set the epoch count used in FIXED mode
    Fix { file: PathBuf, epochs: usize },
    /// Print the epoch budget for the next fit
    Epochs { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), EarlyStoppingError> {
    match command {
        Command::Init {
            file,
            config,
            force,
        } => {
            init(&file, config.as_deref(), force)?;
            println!("Created {}", file.display());
        }
        Command::Show { file } => {
            let tracker = EarlyStopping::from_file(&file)?;
            print_summary(&tracker);
        }
        Command::Record { file, epochs } => {
            update(&file, |tracker| {
                for e in epochs {
                    tracker.record_epochs(e);
                }
                Ok(())
            })?;
        }
        Command::Mode { file, mode } => {
            let mode: EarlyStoppingMode = mode.parse()?;
            update(&file, |tracker| {
                tracker.set_mode(mode);
                Ok(())
            })?;
        }
        Command::Aggregate { file, name } => {
            let aggregate = AggregateFunction::from_name(&name)?;
            update(&file, |tracker| {
                tracker.set_aggregate(aggregate);
                Ok(())
            })?;
        }
        Command::Fix { file, epochs } => {
            update(&file, |tracker| {
                tracker.set_num_epochs(epochs);
                Ok(())
            })?;
        }
        Command::Epochs { file } => {
            let tracker = EarlyStopping::from_file(&file)?;
            println!("{}", tracker.get_epochs()?);
        }
    }
    Ok(())
}

/// Write a fresh tracker to `file`. An existing file is kept unless `force`.
fn init(file: &Path, config: Option<&Path>, force: bool) -> Result<(), EarlyStoppingError> {
    if file.exists() && !force {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists; pass --force to replace it", file.display()),
        )
        .into());
    }
    let config = match config {
        Some(path) => EarlyStoppingConfig::load_json(path)?,
        None => EarlyStoppingConfig::default(),
    };
    config.tracker().to_file(file)
}

/// Load, modify and save a tracker file, then print the result.
fn update(
    file: &Path,
    edit: impl FnOnce(&mut EarlyStopping) -> Result<(), EarlyStoppingError>,
) -> Result<(), EarlyStoppingError> {
    let mut tracker = EarlyStopping::from_file(file)?;
    edit(&mut tracker)?;
    tracker.to_file(file)?;
    print_summary(&tracker);
    Ok(())
}

fn print_summary(tracker: &EarlyStopping) {
    println!("mode:           {}", tracker.mode());
    println!("aggregate:      {}", tracker.aggregate());
    println!("trained epochs: {:?}", tracker.trained_epochs());
    match tracker.optimal_epochs() {
        Ok(epochs) => println!("optimal epochs: {epochs}"),
        Err(_) => println!("optimal epochs: -"),
    }
    match tracker.num_epochs() {
        Some(epochs) => println!("fixed epochs:   {epochs}"),
        None => println!("fixed epochs:   -"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_keeps_existing_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tracker.json");
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Recording);
        tracker.record_epochs(17);
        tracker.to_file(&file).unwrap();

        match init(&file, None, false) {
            Err(EarlyStoppingError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        assert_eq!(EarlyStopping::from_file(&file).unwrap().trained_epochs(), &[17]);
    }

    #[test]
    fn test_init_force_replaces_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tracker.json");
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Recording);
        tracker.record_epochs(17);
        tracker.to_file(&file).unwrap();

        init(&file, None, true).unwrap();
        assert_eq!(EarlyStopping::from_file(&file).unwrap(), EarlyStopping::default());
    }

    #[test]
    fn test_init_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"mode":"FIXED","num_epochs":25}"#).unwrap();
        let file = dir.path().join("out").join("tracker.json");

        init(&file, Some(&config_path), false).unwrap();
        let tracker = EarlyStopping::from_file(&file).unwrap();
        assert_eq!(tracker.mode(), EarlyStoppingMode::Fixed);
        assert_eq!(tracker.get_epochs().unwrap(), 25);
    }
}
