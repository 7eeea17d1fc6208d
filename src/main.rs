//! Concept Explorer CLI
//!
//! Interactive terminal loop: pick a numbered concept to expand it through
//! the oracle, `prune <name>` to drop a branch, `save` to export, `exit`
//! (or Ctrl-C / Ctrl-D) to save and quit.

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use concept_explorer::command::Command;
use concept_explorer::config::{ExplorerConfig, DEFAULT_MAX_DEPTH, DEFAULT_ROOT_CONCEPT};
use concept_explorer::export::Exporter;
use concept_explorer::oracle::build_oracle;
use concept_explorer::session::ExplorationSession;
use concept_explorer::OracleKind;

mod display;

/// Interactively explore conceptual connections with an LLM oracle
#[derive(Parser)]
#[command(name = "concept-explorer")]
#[command(version)]
#[command(about = "Interactively explore conceptual connections with an LLM oracle")]
struct Cli {
    /// The root concept to start exploration with
    #[arg(long, default_value = DEFAULT_ROOT_CONCEPT)]
    root: String,

    /// Maximum exploration depth for any branch
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Oracle backend (gemini, openai)
    #[arg(long, default_value = "gemini")]
    provider: OracleKind,

    /// Model name (defaults per provider)
    #[arg(long)]
    model: Option<String>,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const EXPAND_PAUSE: Duration = Duration::from_millis(200);
const NOTICE_PAUSE: Duration = Duration::from_millis(1500);
const SAVE_PAUSE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match ExplorerConfig::from_env(cli.provider.clone()) {
        Ok(config) => config,
        Err(e) => {
            display::error(&format!("FATAL: {e}"));
            display::notice("Add the API key for your provider to the environment or a .env file.");
            std::process::exit(1);
        }
    };
    config.root_concept = cli.root;
    config.max_depth = cli.depth;
    if let Some(model) = cli.model {
        config.model = model;
    }
    config.output_dir = cli.out_dir;
    config.validate()?;

    let oracle = build_oracle(
        &config.provider,
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.as_deref(),
    )?;
    let mut session =
        ExplorationSession::new(config.root_concept.clone(), config.max_depth, oracle);
    let exporter = Exporter::new(&config.output_dir);
    info!(dir = %exporter.dir().display(), "exports will be written here");

    // Dropping `run` mid-expansion leaves the graph untouched: grafting
    // happens only after the oracle reply arrives.
    let mut input = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    tokio::select! {
        _ = run(&mut session, &exporter, &mut input) => {}
        _ = interrupted() => display::notice("\nInterrupted."),
    }

    display::notice("\nExploration ended.");
    save(&session, &exporter).await;
    println!("\nThank you for using the Concept Explorer!");
    Ok(())
}

/// Forward lines from `reader` on a plain thread.
///
/// A blocking stdin read cannot be cancelled, so it stays off the runtime;
/// the channel closes on EOF or a read error.
fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    break;
                }
            }
        }
        debug!("input closed");
    });
    rx
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn run(
    session: &mut ExplorationSession,
    exporter: &Exporter,
    input: &mut mpsc::UnboundedReceiver<String>,
) {
    let oracle_name = session.oracle_kind().to_string();
    loop {
        let choices = session.choices();
        display::screen(session, &choices);

        if choices.is_empty() {
            display::success(
                "\n🎉 No more concepts to explore (or max depth reached). Exploration complete!",
            );
            return;
        }

        display::prompt();
        let Some(line) = input.recv().await else {
            return;
        };

        match Command::parse(&line, choices.len()) {
            Command::Exit => return,
            Command::Save => {
                save(session, exporter).await;
                tokio::time::sleep(SAVE_PAUSE).await;
            }
            Command::Prune(name) => {
                match session.prune(&name) {
                    Ok(report) => display::notice(&format!(
                        "Pruned branch starting from '{}' ({} concepts).",
                        report.concept,
                        report.removed.len()
                    )),
                    Err(e) => display::error(&e.to_string()),
                }
                tokio::time::sleep(NOTICE_PAUSE).await;
            }
            Command::Explore(index) => {
                explore(session, index, &oracle_name).await;
                tokio::time::sleep(EXPAND_PAUSE).await;
            }
            Command::Invalid(_) => {
                display::error(
                    "Invalid command. Please enter a number from the list or a valid command.",
                );
                tokio::time::sleep(NOTICE_PAUSE).await;
            }
        }
    }
}

/// Expand one choice, showing oracle progress as it happens
async fn explore(session: &mut ExplorationSession, index: usize, oracle_name: &str) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = {
        let expansion = session.expand_choice(index, &tx);
        tokio::pin!(expansion);
        loop {
            tokio::select! {
                result = &mut expansion => break result,
                Some(event) = rx.recv() => display::event(&event, oracle_name),
            }
        }
    };
    while let Ok(event) = rx.try_recv() {
        display::event(&event, oracle_name);
    }

    if let Err(e) = result {
        display::error(&e.to_string());
    }
}

async fn save(session: &ExplorationSession, exporter: &Exporter) {
    match session.save(exporter).await {
        Ok(Some(paths)) => display::saved(&paths),
        Ok(None) => display::notice("Graph is empty, nothing to save."),
        Err(e) => display::error(&format!("Save failed: {e}")),
    }
}
