use std::collections::HashSet;

/// Case-insensitive set of every concept seen during a session.
///
/// Owned by the session next to its [`ConceptGraph`](super::ConceptGraph);
/// every concept in the graph has its lowercase form here.
#[derive(Debug, Clone, Default)]
pub struct SeenRegistry {
    seen: HashSet<String>,
}

impl SeenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Record `name`. Returns `true` if it had not been seen before.
    pub fn mark_seen(&mut self, name: &str) -> bool {
        self.seen.insert(Self::key(name))
    }

    pub fn is_seen(&self, name: &str) -> bool {
        self.seen.contains(&Self::key(name))
    }

    /// Forget every name in `names`
    pub fn unmark<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.seen.remove(&Self::key(name.as_ref()));
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
