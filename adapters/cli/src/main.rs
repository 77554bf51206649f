#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Hellas Quest in a terminal.

mod app;
mod input;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use hellas_quest_persistence::{Gateway, JsonFileStore, KeyValueStore, MemoryStore};
use hellas_quest_rendering::{Presentation, RenderingBackend};
use hellas_quest_session::{Session, SessionConfig};
use hellas_quest_system_question_bank::QuestionBank;
use tracing::info;

use crate::{
    app::App,
    terminal::{spawn_line_reader, TerminalBackend},
};

/// Ancient Greece trivia quest for the terminal.
#[derive(Debug, Parser)]
#[command(name = "hellas-quest", version)]
struct Cli {
    /// Seed for question selection and option order
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding lifetime progress; progress is not kept without it
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// TOML file overriding the session rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

/// Entry point for the Hellas Quest command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_path(path)
            .with_context(|| format!("failed to load session config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    let bank = QuestionBank::builtin().context("built-in question table is invalid")?;
    let store: Box<dyn KeyValueStore> = match &cli.save {
        Some(path) => Box::new(
            JsonFileStore::open_or_recover(path)
                .with_context(|| format!("failed to open save file {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    let gateway = Gateway::new(store);

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, questions = bank.len(), "starting Hellas Quest");
    let session = Session::new(config, bank, gateway.load(), seed);

    let mut app = App::new(session, gateway);
    let presentation = Presentation::new(app.banner(), app.scene());
    TerminalBackend::new(spawn_line_reader(io::BufReader::new(io::stdin())), io::stdout())
        .run(presentation, move |dt, input, scene| app.frame(dt, input, scene))
}
