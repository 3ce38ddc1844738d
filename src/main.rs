//! ReasonKit Reader CLI
//!
//! Loads a page, runs reader-mode activations and controls against it, and
//! writes the resulting document.

use anyhow::{Context, Result};
use clap::Parser;
use reasonkit_reader::{Page, ReaderConfig, ReaderSession, SessionAction, Strategy};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// ReasonKit Reader
#[derive(Parser, Debug)]
#[command(name = "rk-reader")]
#[command(author = "ReasonKit Team <team@reasonkit.sh>")]
#[command(version)]
#[command(about = "Reader mode for saved web pages")]
struct Args {
    /// HTML file to load ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Earlier pages in the tab's history, oldest first
    #[arg(long = "history", value_name = "FILE")]
    history: Vec<PathBuf>,

    /// Presentation strategy: overlay or replace (overrides the config file)
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Step to run: activate, theme=<light|sepia|dark>, grow, shrink,
    /// text-only, close (repeatable; default: a single activate)
    #[arg(short, long = "action", value_name = "ACTION")]
    actions: Vec<SessionAction>,

    /// Write the resulting document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the session state as JSON on stderr
    #[arg(long)]
    report: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut markup = String::new();
            std::io::stdin()
                .read_to_string(&mut markup)
                .context("Failed to read stdin")?;
            Ok(markup)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ReaderConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReaderConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }

    let mut entries = args
        .history
        .iter()
        .map(|path| read_input(Some(path)))
        .collect::<Result<Vec<_>>>()?;
    entries.push(read_input(args.input.as_deref())?);
    let mut page = Page::with_history(entries);

    tracing::info!(
        "ReasonKit Reader {} ({} strategy)",
        reasonkit_reader::VERSION,
        config.strategy
    );

    let mut session = ReaderSession::new(config);
    if session.resume(&page) {
        tracing::info!("Input already carries a reader surface; controls re-bound");
    }

    let actions = if args.actions.is_empty() {
        vec![SessionAction::Activate]
    } else {
        args.actions.clone()
    };
    for action in actions {
        let outcome = session
            .apply(action, &mut page)
            .with_context(|| format!("Action {} failed", action))?;
        tracing::debug!("{} -> {:?}", action, outcome);
    }

    let html = page.to_html();
    match &args.output {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .context("Failed to write stdout")?,
    }

    if args.report {
        let report = serde_json::to_string_pretty(&session.report(&page))?;
        eprintln!("{}", report);
    }

    Ok(())
}
