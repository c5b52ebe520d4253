//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `providers` | Configured providers, availability and breaker state |
//! | `process <file>` | Summary, flashcards and quiz for a text file |
//! | `rank <profiles.json> --subject <id>` | Ranked candidates with scores |
//! | `config` | Effective configuration as TOML |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use studagent_application::resilience::BreakerConfig;
use studagent_application::services::{LlmOrchestrator, RoutedProvider};
use studagent_domain::value_objects::{
    Capability, FeatureCategory, MatchResult, MatchWeights, ProviderDescriptor,
    ProviderHealthSnapshot,
};
use studagent_domain::PipelineResult;
use studagent_infrastructure::bootstrap::{build_provider, init_app_with_keys};
use studagent_infrastructure::config::loader::validate_app_config;
use studagent_infrastructure::config::{AppConfig, ConfigLoader};
use studagent_infrastructure::logging::init_logging;
use studagent_infrastructure::stores::{InMemoryDocumentStore, InMemoryProfileRepository};
use tracing::info;

/// Command line interface for Studagent
#[derive(Parser, Debug)]
#[command(name = "studagent")]
#[command(about = "Study material generation and profile matching over fault-tolerant LLM providers")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use the deterministic offline provider instead of the configured ones
    #[arg(long, global = true)]
    pub offline: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured providers with availability and breaker state
    Providers {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate study material for a plain-text file
    Process {
        /// File holding the extracted document text
        file: PathBuf,

        /// Document identifier (defaults to the file stem)
        #[arg(long)]
        id: Option<String>,
    },

    /// Rank candidates from a JSON file of feature vectors
    Rank {
        /// JSON array of `{entity_id, features}` objects
        profiles: PathBuf,

        /// Entity to rank candidates for
        #[arg(long)]
        subject: String,

        /// Candidate to rank; repeatable (defaults to every other profile)
        #[arg(long = "candidate")]
        candidates: Vec<String>,

        /// Category weight as `category=value`; repeatable, rescaled to sum to 1
        #[arg(long = "weight", value_parser = parse_weight)]
        weights: Vec<(FeatureCategory, f64)>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

/// One line of the `providers` listing
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRow {
    /// Configured provider
    pub descriptor: ProviderDescriptor,
    /// Breaker view, when the adapter could be built
    pub health: Option<ProviderHealthSnapshot>,
    /// Why the adapter could not be built
    pub unavailable: Option<String>,
}

fn parse_weight(raw: &str) -> Result<(FeatureCategory, f64), String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected category=value, got '{raw}'"))?;
    let category = category
        .parse::<FeatureCategory>()
        .map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight '{value}': {e}"))?;
    Ok((category, value))
}

fn env_key(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Single deterministic provider used by `--offline`
pub fn offline_providers() -> Vec<ProviderDescriptor> {
    vec![ProviderDescriptor::new("offline", "null", "null", 1)]
}

/// Load configuration and apply command line overrides
pub fn load_config(
    config_path: Option<&Path>,
    log_level: Option<&str>,
    offline: bool,
) -> anyhow::Result<AppConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load()?;
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    if offline {
        config.providers = offline_providers();
    }
    validate_app_config(&config)?;
    Ok(config)
}

/// Availability and breaker state of every configured provider
pub fn provider_rows<F>(config: &AppConfig, api_key: F) -> anyhow::Result<Vec<ProviderRow>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut rows = Vec::with_capacity(config.providers.len());
    let mut routed = Vec::new();
    for descriptor in &config.providers {
        match build_provider(descriptor, &api_key) {
            Ok(adapter) => routed.push(RoutedProvider::new(descriptor.clone(), adapter)),
            Err(reason) => rows.push(ProviderRow {
                descriptor: descriptor.clone(),
                health: None,
                unavailable: Some(reason),
            }),
        }
    }

    let orchestrator = LlmOrchestrator::new(routed, BreakerConfig::from(&config.breaker))?;
    rows.extend(orchestrator.provider_status().into_iter().map(|status| ProviderRow {
        descriptor: status.descriptor,
        health: Some(status.health),
        unavailable: None,
    }));
    rows.sort_by(|a, b| {
        a.descriptor
            .priority
            .cmp(&b.descriptor.priority)
            .then_with(|| a.descriptor.name.cmp(&b.descriptor.name))
    });
    Ok(rows)
}

/// Run the document pipeline over a text file
pub async fn process_file<F>(
    config: AppConfig,
    file: &Path,
    document_id: Option<String>,
    api_key: F,
) -> anyhow::Result<PipelineResult>
where
    F: Fn(&str) -> Option<String>,
{
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document_id = match document_id {
        Some(id) => id,
        None => file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .context("Cannot derive a document id from the file name; pass --id")?,
    };

    let store = Arc::new(InMemoryDocumentStore::new());
    store.put_document(&document_id, &text).await;
    let context = init_app_with_keys(
        config,
        store,
        Arc::new(InMemoryProfileRepository::new()),
        api_key,
    )?;

    info!(document_id = %document_id, chars = text.chars().count(), "Processing document");
    Ok(context.pipeline().run(&document_id).await?)
}

/// Rank candidates from a profile file
pub async fn rank_file<F>(
    config: AppConfig,
    profiles: &Path,
    subject: &str,
    candidates: Vec<String>,
    weights: &[(FeatureCategory, f64)],
    api_key: F,
) -> anyhow::Result<Vec<MatchResult>>
where
    F: Fn(&str) -> Option<String>,
{
    let repository = InMemoryProfileRepository::from_json_file(profiles).await?;
    let candidates = if candidates.is_empty() {
        repository
            .entity_ids()
            .await
            .into_iter()
            .filter(|id| id != subject)
            .collect()
    } else {
        candidates
    };
    if candidates.is_empty() {
        bail!("No candidates to rank for {subject}");
    }

    let weights = if weights.is_empty() {
        None
    } else {
        let map: BTreeMap<FeatureCategory, f64> = weights.iter().copied().collect();
        Some(MatchWeights::normalized(map)?)
    };

    let context = init_app_with_keys(
        config,
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(repository),
        api_key,
    )?;
    Ok(context
        .matcher()
        .rank_candidates(subject, &candidates, weights.as_ref())
        .await?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_provider_table(rows: &[ProviderRow]) {
    println!(
        "{:<18} {:<11} {:<34} {:>3}  {:<10} CAPABILITIES",
        "NAME", "KIND", "MODEL", "PRI", "STATE"
    );
    for row in rows {
        let state = row
            .health
            .as_ref()
            .map_or_else(|| "unavailable".to_string(), |h| h.state.to_string());
        let capabilities: Vec<&str> = row
            .descriptor
            .capabilities
            .iter()
            .map(Capability::as_str)
            .collect();
        println!(
            "{:<18} {:<11} {:<34} {:>3}  {:<10} {}",
            row.descriptor.name,
            row.descriptor.kind,
            row.descriptor.model,
            row.descriptor.priority,
            state,
            capabilities.join(",")
        );
        if let Some(reason) = &row.unavailable {
            println!("{:<18} ({reason})", "");
        }
    }
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.log_level.as_deref(), cli.offline)?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Providers { json } => {
            let rows = provider_rows(&config, env_key)?;
            if json {
                print_json(&rows)?;
            } else {
                print_provider_table(&rows);
            }
        }
        Command::Process { file, id } => {
            let result = process_file(config, &file, id, env_key).await?;
            print_json(&result)?;
        }
        Command::Rank {
            profiles,
            subject,
            candidates,
            weights,
            limit,
        } => {
            let mut config = config;
            if limit.is_some() {
                config.matching.limit = limit;
            }
            let results =
                rank_file(config, &profiles, &subject, candidates, &weights, env_key).await?;
            print_json(&results)?;
        }
        Command::Config { write } => match write {
            Some(path) => {
                ConfigLoader::new().save_to_file(&config, &path)?;
                info!(path = %path.display(), "Configuration written");
            }
            None => print!("{}", toml::to_string_pretty(&config)?),
        },
    }
    Ok(())
}
