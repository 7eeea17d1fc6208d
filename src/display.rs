//! Terminal presentation for the interactive explorer.

use std::io::{stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Stylize;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{Command, ExecutableCommand};
use tracing::debug;

use concept_explorer::export::ExportPaths;
use concept_explorer::render::TreeLine;
use concept_explorer::session::ExplorationSession;
use concept_explorer::{ExplorerEvent, NodeClass};

fn rule() -> String {
    let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
    "═".repeat(50.min(width.saturating_sub(2)))
}

fn emit(command: impl Command) {
    if let Err(e) = stdout().execute(command) {
        debug!(error = %e, "terminal command failed");
    }
}

fn flush() {
    if let Err(e) = stdout().flush() {
        debug!(error = %e, "stdout flush failed");
    }
}

pub fn clear() {
    emit(Clear(ClearType::All));
    emit(MoveTo(0, 0));
}

fn tree_line(line: &TreeLine) -> String {
    let connector = format!("{}{}", line.prefix, line.connector.as_str()).cyan();
    let name = line.concept.as_str();
    let name = match line.class {
        NodeClass::Focus => name.white().on_blue().to_string(),
        NodeClass::Root => name.magenta().bold().to_string(),
        NodeClass::Leaf => name.green().to_string(),
        NodeClass::Interior => name.yellow().to_string(),
    };
    let mark = if line.revisit { " (...)" } else { "" };
    format!("{connector}{name}{}", mark.dark_grey())
}

/// Full screen: header, tree, stats, numbered frontier, command hint
pub fn screen(session: &ExplorationSession, choices: &[String]) {
    clear();
    println!("{}", "🌳 CONCEPT EXPLORER 🌳".yellow().bold());
    println!("{}", rule().cyan());

    let lines = session.render();
    if lines.is_empty() {
        println!("{}", "Graph is empty.".red());
    }
    for line in &lines {
        println!("{}", tree_line(line));
    }

    let stats = session.stats();
    println!("\n{}", rule().cyan());
    println!(
        "{}",
        format!(
            "📊 Concepts: {} | Connections: {}",
            stats.concepts, stats.connections
        )
        .yellow()
    );

    if !choices.is_empty() {
        println!("\n{}", "Choose a concept to explore:".bold());
        for (i, concept) in choices.iter().enumerate() {
            println!("  {} {concept}", format!("[{}]", i + 1).cyan());
        }
    }
    println!("\n{} prune [name], save, exit", "Commands:".yellow());
}

pub fn prompt() {
    print!("{} ", ">".bold());
    flush();
}

/// Progress of an in-flight expansion
pub fn event(event: &ExplorerEvent, oracle: &str) {
    match event {
        ExplorerEvent::OraclePending { .. } => {
            print!("{}\r", format!(" 🧠 Thinking with {oracle}...").dark_grey());
            flush();
        }
        ExplorerEvent::OracleFinished { .. } => {
            emit(Clear(ClearType::CurrentLine));
        }
        ExplorerEvent::ConceptsAccepted { accepted, .. } => {
            success(&format!("✓ Found {} new concepts.", accepted.len()));
        }
        ExplorerEvent::ReplyRejected { reason, .. } => {
            error(&format!("✗ Could not use the oracle reply: {reason}"));
        }
    }
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn notice(message: &str) {
    println!("{}", message.yellow());
}

pub fn error(message: &str) {
    println!("{}", message.red());
}

pub fn saved(paths: &ExportPaths) {
    success(&format!("📝 Plain text tree saved to {}", paths.tree.display()));
    success(&format!(
        "📊 GraphML file saved to {} (open with Gephi/Cytoscape)",
        paths.graphml.display()
    ));
    success(&format!("🗂  JSON snapshot saved to {}", paths.snapshot.display()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use concept_explorer::render::Connector;

    #[test]
    fn terminal_helpers_tolerate_non_tty_stdout() {
        clear();
        prompt();
        event(
            &ExplorerEvent::OracleFinished {
                concept: "Creativity".into(),
            },
            "gemini",
        );
    }

    #[test]
    fn revisit_rows_keep_their_mark() {
        let line = TreeLine {
            prefix: "    ".into(),
            connector: Connector::Last,
            concept: "Jazz".into(),
            depth: 2,
            class: NodeClass::Interior,
            revisit: true,
        };
        let drawn = tree_line(&line);
        assert!(drawn.contains("Jazz"));
        assert!(drawn.contains("(...)"));
    }
}
