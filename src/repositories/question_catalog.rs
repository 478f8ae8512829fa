use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{db::Database, errors::AppResult, models::domain::Question};

/// Read-only view over the admin-curated question catalog. Questions are
/// written by the article-ingestion collaborator, never by this service.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// All valid questions for a category, matched case-insensitively.
    async fn list_valid_by_category(&self, category: &str) -> AppResult<Vec<Question>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
}

pub struct MongoQuestionCatalog {
    collection: Collection<Question>,
}

impl MongoQuestionCatalog {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }
}

#[async_trait]
impl QuestionCatalog for MongoQuestionCatalog {
    async fn list_valid_by_category(&self, category: &str) -> AppResult<Vec<Question>> {
        let filter = doc! {
            "category": { "$regex": format!("^{}$", regex::escape(category)), "$options": "i" },
            "valid": true,
        };

        let cursor = self.collection.find(filter).await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }
}
