//! Request text sent to the oracle for one expansion.

/// Separator between concepts in the rendered discovery path
pub const PATH_SEPARATOR: &str = " → ";

/// Render the root-to-concept path, appending `concept` unless the path
/// already ends with it.
pub fn path_string(concept: &str, path: &[String]) -> String {
    let mut parts: Vec<&str> = path.iter().map(String::as_str).collect();
    if parts.last() != Some(&concept) {
        parts.push(concept);
    }
    parts.join(PATH_SEPARATOR)
}

/// Build the context-aware request for expanding `concept`.
pub fn build_prompt(concept: &str, path: &[String]) -> String {
    let full_path = path_string(concept, path);
    format!(
        r#"You are a creative agent that finds unexpected conceptual connections.
You are helping build a web of ideas that spans many intellectual domains.

Exploration path so far: {full_path}
Concept to explore now: "{concept}"

Propose 4-5 related concepts that are relevant to both "{concept}" and the path as a whole.

Guidelines:
1. Range across science, art, philosophy, technology and culture.
2. Keep each concept short: 1-5 words.
3. Prefer surprising, thought-provoking links over obvious associations.
4. Stay relevant to the current concept and to the whole path.
5. Do not repeat any concept already in the path or suggested before.

Reply with a JSON object holding a single key "concepts" whose value is a list of strings.
Example: {{"concepts": ["Quantum Foam", "Aesthetic Experience", "Cognitive Scaffolding", "Emergent Systems"]}}"#
    )
}
