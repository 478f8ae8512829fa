use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's answer (or explicit skip) for one question. At most one response
/// per (user, question) may have `active == true`; restarting the quiz
/// deactivates rows instead of deleting them so prior quiz runs stay
/// available for longitudinal comparison.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Response {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub text: Option<String>,
    pub status: ResponseStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Answered,
    Skipped,
}

impl Response {
    pub fn answered(user_id: &str, question_id: &str, text: &str) -> Self {
        Self::new(user_id, question_id, Some(text.to_string()), ResponseStatus::Answered)
    }

    pub fn skipped(user_id: &str, question_id: &str) -> Self {
        Self::new(user_id, question_id, None, ResponseStatus::Skipped)
    }

    fn new(
        user_id: &str,
        question_id: &str,
        text: Option<String>,
        status: ResponseStatus,
    ) -> Self {
        let now = Utc::now();
        Response {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            text,
            status,
            active: true,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.status == ResponseStatus::Answered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answered_response_is_active_with_text() {
        let response = Response::answered("user-1", "question-1", "Plutôt pour");

        assert!(response.active);
        assert!(response.is_answered());
        assert_eq!(response.text.as_deref(), Some("Plutôt pour"));
    }

    #[test]
    fn skipped_response_has_no_text() {
        let response = Response::skipped("user-1", "question-1");

        assert!(response.active);
        assert!(!response.is_answered());
        assert!(response.text.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ResponseStatus::Skipped).expect("should serialize");
        assert_eq!(json, "\"skipped\"");
    }
}
