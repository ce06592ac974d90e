// lio_example/src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lio-example: a template lidar-inertial odometry pipeline and datasets.
///
/// This struct defines the command-line arguments accepted by the
/// `lio-example` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the TOML config file. A missing file falls back to defaults.
    #[arg(short, long, default_value = "lio.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the available pipelines, their parameters, and every dataset sequence.
    Info,

    /// Print the effective configuration as TOML.
    Config,

    /// Run a pipeline over a dataset sequence and write the trajectory in TUM format.
    Run {
        /// Pipeline name, as listed by `info`.
        #[arg(short, long, default_value = "MyPipeline")]
        pipeline: String,

        /// Dataset and sequence, e.g. `my_raw_dataset/first_trajectory`.
        #[arg(short, long)]
        dataset: String,

        /// Output file. Defaults to `<output_dir>/<dataset>_<sequence>.txt`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record the synthetic data of a sequence into the bag dataset's folder.
    SynthBag {
        #[arg(short, long, default_value = "first_trajectory")]
        sequence: String,
    },

    /// Fetch a dataset sequence into the data directory.
    Download {
        #[arg(short, long)]
        dataset: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["lio-example", "run", "-d", "my_raw_dataset/first_trajectory"]);
        assert_eq!(cli.config, PathBuf::from("lio.toml"));
        assert_eq!(
            cli.command,
            Command::Run {
                pipeline: "MyPipeline".to_string(),
                dataset: "my_raw_dataset/first_trajectory".to_string(),
                output: None,
            }
        );
    }

    #[test]
    fn test_synth_bag_and_config_flag() {
        let cli = Cli::parse_from([
            "lio-example",
            "--config",
            "other.toml",
            "synth-bag",
            "--sequence",
            "second_trajectory",
        ]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(
            cli.command,
            Command::SynthBag {
                sequence: "second_trajectory".to_string()
            }
        );
    }

    #[test]
    fn test_run_requires_dataset() {
        assert!(Cli::try_parse_from(["lio-example", "run"]).is_err());
    }
}
