//! Subcommand implementations.

pub mod init;
pub mod peers;
pub mod plan;
pub mod profile;
pub mod rank;
pub mod recommend;
pub mod search;
pub mod validate;

use anyhow::{Context as _, Result};
use serde::Serialize;

use studyplan_core::dataset::load_dataset;
use studyplan_core::model::Dataset;

use crate::config::{load_config_from, CliConfig};
use crate::DataArgs;

/// How a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    fn parse(format: &str) -> Result<Self> {
        match format {
            "text" => Ok(Output::Text),
            "json" => Ok(Output::Json),
            other => anyhow::bail!("unknown format '{other}', expected text or json"),
        }
    }
}

/// Everything a data-reading command needs.
pub struct Session {
    pub dataset: Dataset,
    pub config: CliConfig,
    pub output: Output,
}

impl Session {
    /// Load config, then the dataset named on the command line or in config.
    pub fn open(args: &DataArgs) -> Result<Self> {
        let output = Output::parse(&args.format)?;
        let config = load_config_from(args.config.as_deref())?;

        let path = args
            .dataset
            .clone()
            .or_else(|| config.dataset.clone())
            .context("no dataset given; pass --dataset or set `dataset` in studyplan.toml")?;
        let dataset = load_dataset(&path)?;
        tracing::debug!(
            "loaded {} students, {} resources from {}",
            dataset.students.len(),
            dataset.resources.len(),
            path.display()
        );

        Ok(Self {
            dataset,
            config,
            output,
        })
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
