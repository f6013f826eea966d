mod show;
mod simulate;

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use guestapp_core::{
    AppConfig, ContentError, ContentPaths, ContentStore, JsonFileStore, LoadedContent, WelcomeGate,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "guestapp")]
#[command(about = "Guest app discovery content and view tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the content files and report rejected records
    Validate {
        /// Fail on any rejected record, regardless of `GUESTAPP_CONTENT_STRICT`
        #[arg(long)]
        strict: bool,
    },
    /// Replay an event script against the discovery view
    Simulate {
        /// Initial viewport width in px; omitted means unknown (mobile)
        #[arg(long)]
        width: Option<u32>,
        /// JSON or YAML list of steps
        #[arg(long)]
        script: PathBuf,
    },
    /// Print the detail overlay for one location
    Show {
        /// Location id
        id: String,
        /// Wall-clock time (HH:MM) used for the open/closed status
        #[arg(long, value_parser = parse_clock)]
        at: Option<NaiveTime>,
        /// Picks the directions provider (Apple Maps for Apple devices)
        #[arg(long)]
        user_agent: Option<String>,
        /// Single status line including distance
        #[arg(long)]
        compact: bool,
        /// Emit the presentation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report or dismiss the one-time welcome message
    Welcome {
        #[arg(long)]
        dismiss: bool,
    },
}

fn parse_clock(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = guestapp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Validate { strict }) => run_validate(&config, strict),
        Some(Commands::Simulate { width, script }) => {
            let content = load_content(&config, config.content_strict)?;
            simulate::run_simulate(&config, content.store, width, &script)
        }
        Some(Commands::Show {
            id,
            at,
            user_agent,
            compact,
            json,
        }) => {
            let content = load_content(&config, config.content_strict)?;
            show::run_show(
                &content.store,
                &id,
                at,
                user_agent.as_deref(),
                show::ShowFormat { compact, json },
            )
        }
        Some(Commands::Welcome { dismiss }) => run_welcome(&config, dismiss),
        None => {
            println!("guestapp ready ({}); see --help", config.env);
            Ok(())
        }
    }
}

fn content_paths(config: &AppConfig) -> ContentPaths {
    ContentPaths {
        locations: config.locations_path.clone(),
        details: config.details_path.clone(),
    }
}

fn load_content(config: &AppConfig, strict: bool) -> anyhow::Result<LoadedContent> {
    let loaded = ContentStore::load(&content_paths(config), strict)?;
    if !loaded.issues.is_empty() {
        tracing::warn!(
            rejected = loaded.issues.len(),
            "some content records were rejected; run `guestapp validate` for details"
        );
    }
    Ok(loaded)
}

/// Load content and print one line per rejected record.
///
/// # Errors
///
/// Returns an error if the files cannot be read or parsed, or if strict
/// validation rejects any record.
fn run_validate(config: &AppConfig, strict: bool) -> anyhow::Result<()> {
    let strict = strict || config.content_strict;
    match ContentStore::load(&content_paths(config), strict) {
        Ok(loaded) => {
            println!(
                "{} locations loaded from {}",
                loaded.store.len(),
                config.locations_path.display()
            );
            if loaded.issues.is_empty() {
                println!("no rejected records");
            } else {
                println!("{} rejected records:", loaded.issues.len());
                for issue in &loaded.issues {
                    println!("  {issue}");
                }
            }
            Ok(())
        }
        Err(ContentError::Invalid(issues)) => {
            for issue in &issues {
                println!("  {issue}");
            }
            anyhow::bail!("strict validation failed: {} rejected records", issues.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_welcome(config: &AppConfig, dismiss: bool) -> anyhow::Result<()> {
    let mut gate = WelcomeGate::open(JsonFileStore::new(&config.state_path))?;
    if dismiss {
        gate.dismiss()?;
        println!("welcome message dismissed");
    } else if gate.should_show() {
        println!("welcome message: pending");
    } else {
        println!("welcome message: dismissed");
    }
    Ok(())
}
