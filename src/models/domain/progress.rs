use serde::{Deserialize, Serialize};

/// Ephemeral traversal state for one user's quiz session. The object is
/// handed to the client in every response and sent back with the next
/// request, so the server holds no per-session state and no locking is
/// needed across requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizProgress {
    /// Category currently being presented.
    #[serde(default)]
    pub current_category: Option<String>,
    /// Categories found empty or fully handled during this traversal,
    /// lowercased, in the order they were exhausted.
    #[serde(default)]
    pub exhausted: Vec<String>,
    /// Set by "save and pause"; a later resume returns to `last_category`.
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub last_category: Option<String>,
    /// True when this traversal is a second-or-later quiz attempt.
    #[serde(default)]
    pub follow_up: bool,
}

impl QuizProgress {
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Fresh progress for a retake: traversal state empty, follow-up set.
    pub fn follow_up() -> Self {
        QuizProgress {
            follow_up: true,
            ..Self::default()
        }
    }

    pub fn is_exhausted(&self, category: &str) -> bool {
        let needle = category.to_lowercase();
        self.exhausted.iter().any(|c| c == &needle)
    }

    pub fn mark_exhausted(&mut self, category: &str) {
        let entry = category.to_lowercase();
        if !self.exhausted.contains(&entry) {
            self.exhausted.push(entry);
        }
    }

    pub fn pause(&mut self, category: &str) {
        self.paused = true;
        self.last_category = Some(category.to_string());
    }

    /// Clears traversal state at quiz completion. The follow-up flag
    /// survives so the synthesis step still knows to include history; it is
    /// reset once a new profile has been produced.
    pub fn clear_traversal(&mut self) {
        self.current_category = None;
        self.exhausted.clear();
        self.paused = false;
        self.last_category = None;
    }
}
