//! Commands accepted at the interactive prompt.

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Expand the frontier entry at this zero-based index
    Explore(usize),
    /// Prune the named concept (verbatim, trimmed)
    Prune(String),
    Save,
    Exit,
    Invalid(String),
}

impl Command {
    /// Parse `input` against a frontier menu of `choice_count` entries,
    /// numbered from 1.
    pub fn parse(input: &str, choice_count: usize) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "exit" | "quit" => return Command::Exit,
            "save" => return Command::Save,
            _ => {}
        }

        if lower.starts_with("prune ") {
            if let Some(name) = trimmed.get("prune ".len()..).map(str::trim) {
                if !name.is_empty() {
                    return Command::Prune(name.to_string());
                }
            }
        }

        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(choice) = trimmed.parse::<usize>() {
                if (1..=choice_count).contains(&choice) {
                    return Command::Explore(choice - 1);
                }
            }
        }

        Command::Invalid(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_case_insensitively() {
        assert_eq!(Command::parse("exit", 3), Command::Exit);
        assert_eq!(Command::parse("  QUIT ", 3), Command::Exit);
        assert_eq!(Command::parse("Save", 3), Command::Save);
    }

    #[test]
    fn prune_keeps_name_verbatim() {
        assert_eq!(
            Command::parse("prune   Quantum Foam  ", 3),
            Command::Prune("Quantum Foam".into())
        );
        assert_eq!(
            Command::parse("PRUNE jazz", 3),
            Command::Prune("jazz".into())
        );
        assert_eq!(
            Command::parse("prune ", 3),
            Command::Invalid("prune".into())
        );
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(Command::parse("1", 3), Command::Explore(0));
        assert_eq!(Command::parse("3", 3), Command::Explore(2));
        assert_eq!(Command::parse("0", 3), Command::Invalid("0".into()));
        assert_eq!(Command::parse("4", 3), Command::Invalid("4".into()));
        assert_eq!(Command::parse("-1", 3), Command::Invalid("-1".into()));
        assert_eq!(Command::parse("1", 0), Command::Invalid("1".into()));
    }

    #[test]
    fn anything_else_is_invalid() {
        assert_eq!(Command::parse("", 3), Command::Invalid(String::new()));
        assert_eq!(Command::parse("explore", 3), Command::Invalid("explore".into()));
    }
}
