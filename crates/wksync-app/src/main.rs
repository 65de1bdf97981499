use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wksync_api::WaniKaniClient;
use wksync_config::Config;
use wksync_core::{ReviewEntry, VocabularySubject};
use wksync_dictionary::{DefinitionIndex, IndexOptions};

#[derive(Parser)]
#[command(
    name = "wksync",
    about = "Sync JMdict definitions into WaniKani meaning synonyms"
)]
struct Cli {
    /// WaniKani levels to sync, comma separated with no spaces (e.g. "1,2,3").
    /// Prompted interactively when omitted; empty means all levels.
    #[arg(long)]
    levels: Option<String>,

    /// Stop after writing the review file; never push.
    #[arg(long)]
    review_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("configuration error")?;

    run(cli, config).await
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let levels = match cli.levels {
        Some(levels) => levels.trim().to_string(),
        None => prompt("Which levels? (comma separated, no spaces, empty for all) ")?,
    };

    let client = WaniKaniClient::new(config.api_url.clone(), config.api_key.clone());

    let mut subjects = client
        .fetch_vocabulary((!levels.is_empty()).then_some(levels.as_str()))
        .await
        .context("failed to fetch vocabulary subjects")?;

    let study_materials = client
        .fetch_study_materials()
        .await
        .context("failed to fetch study materials")?;
    for subject in &mut subjects {
        if let Some(material) = study_materials.get(&subject.id) {
            subject.study_material_id = Some(material.id);
            subject.synonyms = material.meaning_synonyms.clone();
        }
    }

    let words = wksync_dictionary::load_words(&config.dict_path)
        .context("failed to load the dictionary")?;
    let targets: HashSet<String> = subjects.iter().map(|s| s.characters.clone()).collect();
    let options = IndexOptions {
        max_definitions: config.max_definitions,
        max_definition_len: config.max_definition_len,
    };
    let index = DefinitionIndex::build(&words, &targets, &options);
    tracing::info!(terms = index.len(), "built definition index");

    let mut pending = 0usize;
    for subject in &mut subjects {
        if let Some(definitions) = index.get(&subject.characters) {
            subject.definitions = definitions.to_vec();
        }
        if subject.merge_definitions(config.synonym_capacity) {
            pending += 1;
        }
    }

    write_review(&config.review_path, &subjects)?;
    tracing::info!(
        total = subjects.len(),
        pending,
        review = %config.review_path.display(),
        "review file written"
    );

    if cli.review_only {
        return Ok(());
    }
    if pending == 0 {
        tracing::info!("nothing to update");
        return Ok(());
    }
    if !confirm(&format!(
        "Push {pending} study material update(s) to WaniKani? [y/N] "
    ))? {
        tracing::info!("push aborted by user");
        return Ok(());
    }

    push_updates(&client, &subjects).await;
    Ok(())
}

/// Push every flagged subject, one at a time. Failures are reported and the
/// loop continues; updates are independent of each other.
async fn push_updates(client: &WaniKaniClient<wksync_api::HttpTransport>, subjects: &[VocabularySubject]) {
    let mut pushed = 0usize;
    let mut failed = 0usize;

    for subject in subjects.iter().filter(|s| s.needs_update) {
        match client.push_synonyms(subject).await {
            Ok(outcome) if outcome.is_success() => {
                pushed += 1;
                tracing::info!(
                    subject_id = subject.id,
                    term = %subject.characters,
                    synonyms = subject.synonyms.len(),
                    "updated"
                );
            }
            Ok(outcome) => {
                failed += 1;
                tracing::error!(
                    subject_id = subject.id,
                    term = %subject.characters,
                    status = outcome.status,
                    body = %outcome.body,
                    "update rejected"
                );
            }
            Err(error) => {
                failed += 1;
                tracing::error!(
                    subject_id = subject.id,
                    term = %subject.characters,
                    error = %error,
                    "update failed"
                );
            }
        }
    }

    tracing::info!(pushed, failed, "push phase complete");
}

fn write_review(path: &Path, subjects: &[VocabularySubject]) -> Result<()> {
    let entries: Vec<ReviewEntry> = subjects.iter().map(ReviewEntry::from).collect();
    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(message)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
