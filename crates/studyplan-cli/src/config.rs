//! CLI configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studyplan_core::recommend::RecommendConfig;

/// Top-level studyplan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Dataset used when a command gets no `--dataset`.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    /// Planning and ranking defaults.
    #[serde(default)]
    pub recommend: RecommendConfig,
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `studyplan.toml` in the current directory
/// 2. `~/.config/studyplan/config.toml`
///
/// Environment variable overrides: `STUDYPLAN_TOTAL_MINUTES`, `STUDYPLAN_SLICE`.
pub fn load_config_from(path: Option<&Path>) -> Result<CliConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studyplan.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<CliConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => CliConfig::default(),
    };

    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `STUDYPLAN_*` overrides looked up through `lookup`.
fn apply_overrides(
    mut config: CliConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CliConfig> {
    if let Some(v) = lookup("STUDYPLAN_TOTAL_MINUTES") {
        config.recommend.total_minutes = v
            .trim()
            .parse()
            .with_context(|| format!("invalid STUDYPLAN_TOTAL_MINUTES: '{v}'"))?;
    }
    if let Some(v) = lookup("STUDYPLAN_SLICE") {
        config.recommend.slice = v
            .trim()
            .parse()
            .with_context(|| format!("invalid STUDYPLAN_SLICE: '{v}'"))?;
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studyplan"))
}
