use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An admin-curated opinion question. Questions are produced by the article
/// ingestion collaborator and are read-only to this service: only questions
/// with `valid == true` are ever presented.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: String,
    pub valid: bool,
    pub refused: bool,
    pub article_id: Option<String>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(text: &str, category: &str) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            category: category.to_string(),
            valid: false,
            refused: false,
            article_id: None,
            source_url: None,
            created_at: Utc::now(),
            validated_at: None,
        }
    }
}
