// lio_example/src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use lio_example::cli::{Cli, Command};
use lio_example::datasets::{DATASET_NAMES, IMU_CHANNEL, LIDAR_CHANNEL};
use lio_example::logging::init_logging;
use lio_example::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // --- 1. Parse Command-Line Arguments & Load Configuration ---
    let cli = Cli::parse();
    let config = ExampleConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;

    init_logging(&config.log_filter);
    info!("Using config file: {}", cli.config.display());

    // --- 2. Dispatch ---
    match cli.command {
        Command::Info => print_info(&config),
        Command::Config => {
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            print!("{}", rendered);
        }
        Command::Run {
            pipeline,
            dataset,
            output,
        } => run(&config, &pipeline, &dataset, output)?,
        Command::SynthBag { sequence } => synth_bag(&config, &sequence)?,
        Command::Download { dataset } => {
            let dataset = build_dataset(&dataset, &config)?;
            if let Err(e) = dataset.download() {
                error!("Could not download {}: {}", dataset.full_name(), e);
                return Err(e.into());
            }
            info!("Downloaded {} to {}", dataset.full_name(), dataset.folder().display());
        }
    }
    Ok(())
}

fn print_info(config: &ExampleConfig) {
    println!("Pipelines:");
    for pipeline in all_pipelines() {
        println!("  {} ({})", pipeline.name(), pipeline.url());
        for (key, value) in pipeline.default_params() {
            println!("    {} = {}", key, value);
        }
    }

    println!("Datasets ({}):", DATASET_NAMES.join(", "));
    for dataset in all_datasets(config) {
        let status = if dataset.is_downloaded() {
            "downloaded"
        } else {
            "missing"
        };
        println!("  {} [{}]", dataset.full_name(), status);
    }
}

fn run(
    config: &ExampleConfig,
    pipeline_name: &str,
    dataset_name: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(pipeline_name)?;
    let dataset = build_dataset(dataset_name, config)?;

    let summary = run_pipeline(&mut *pipeline, &*dataset, &config.params)
        .with_context(|| format!("{} failed on {}", pipeline_name, dataset.full_name()))?;
    if summary.trajectory.is_empty() {
        bail!("{} produced no poses on {}", pipeline_name, dataset.full_name());
    }

    let output = output.unwrap_or_else(|| {
        config.output_dir.join(format!(
            "{}_{}.txt",
            dataset.dataset_name(),
            dataset.sequence_name()
        ))
    });
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    summary.trajectory.to_tum(&output)?;
    info!(
        "Saved {} poses to {}",
        summary.trajectory.len(),
        output.display()
    );
    Ok(())
}

fn synth_bag(config: &ExampleConfig, sequence: &str) -> anyhow::Result<()> {
    let sequence: ExampleSequence = sequence.parse().map_err(anyhow::Error::msg)?;
    let source = MyRawDataset::new(sequence, &config.data_dir, config.seed);
    let target = MyBagDataset::new(sequence, &config.data_dir);

    let summary = export_to_bag(&source, &target.bag_path(), IMU_CHANNEL, LIDAR_CHANNEL)?;
    println!(
        "Recorded {} messages into {}",
        summary.message_count,
        summary.path.display()
    );
    Ok(())
}
