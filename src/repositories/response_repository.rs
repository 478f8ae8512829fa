use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use uuid::Uuid;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Response, ResponseStatus},
};

/// The Response Store. Sole writer of `Response` rows; the traversal
/// controller and the synthesis pipeline only read through this trait.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// All active responses (answered and skipped) for a user.
    async fn get_active(&self, user_id: &str) -> AppResult<Vec<Response>>;
    /// Deactivated answered responses, newest first, optionally limited.
    async fn get_historical(&self, user_id: &str, limit: Option<i64>) -> AppResult<Vec<Response>>;
    /// Upserts the active row for (user, question). `text == None` records a
    /// skip. Re-submitting updates the existing active row in place.
    async fn save(&self, user_id: &str, question_id: &str, text: Option<&str>)
        -> AppResult<Response>;
    /// Deactivates every active response for the user, keeping at most one
    /// historical row per (user, question). Returns the deactivated count.
    async fn deactivate_all(&self, user_id: &str) -> AppResult<u64>;
}

pub struct MongoResponseRepository {
    collection: Collection<Response>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for responses collection");

        // The (user, question, active=true) uniqueness constraint: a partial
        // unique index only covers active rows, so any number of historical
        // rows may exist while at most one row per pair stays active.
        let active_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("unique_active_response".to_string())
                    .partial_filter_expression(doc! { "active": true })
                    .build(),
            )
            .build();

        self.collection.create_index(active_index).await?;

        log::info!("Successfully created indexes for responses collection");
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn get_active(&self, user_id: &str) -> AppResult<Vec<Response>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id, "active": true })
            .await?;
        let responses: Vec<Response> = cursor.try_collect().await?;
        Ok(responses)
    }

    async fn get_historical(&self, user_id: &str, limit: Option<i64>) -> AppResult<Vec<Response>> {
        let filter = doc! {
            "user_id": user_id,
            "active": false,
            "status": to_bson(&ResponseStatus::Answered)?,
        };

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(find_options)
            .await?;
        let responses: Vec<Response> = cursor.try_collect().await?;
        Ok(responses)
    }

    async fn save(
        &self,
        user_id: &str,
        question_id: &str,
        text: Option<&str>,
    ) -> AppResult<Response> {
        let status = if text.is_some() {
            ResponseStatus::Answered
        } else {
            ResponseStatus::Skipped
        };
        let now = to_bson(&Utc::now())?;

        let filter = doc! { "user_id": user_id, "question_id": question_id, "active": true };
        let update = doc! {
            "$set": {
                "text": to_bson(&text)?,
                "status": to_bson(&status)?,
                "modified_at": now.clone(),
            },
            "$setOnInsert": {
                "id": Uuid::new_v4().to_string(),
                "user_id": user_id,
                "question_id": question_id,
                "active": true,
                "created_at": now,
            },
        };

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let saved = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;

        saved.ok_or_else(|| {
            AppError::DatabaseError("response upsert returned no document".to_string())
        })
    }

    async fn deactivate_all(&self, user_id: &str) -> AppResult<u64> {
        let active = self.get_active(user_id).await?;
        let question_ids: Vec<String> = active.iter().map(|r| r.question_id.clone()).collect();

        if !question_ids.is_empty() {
            // Drop any earlier historical row for the same question first:
            // only the run being deactivated survives as history.
            self.collection
                .delete_many(doc! {
                    "user_id": user_id,
                    "active": false,
                    "question_id": { "$in": question_ids },
                })
                .await?;
        }

        let result = self
            .collection
            .update_many(
                doc! { "user_id": user_id, "active": true },
                doc! { "$set": { "active": false, "modified_at": to_bson(&Utc::now())? } },
            )
            .await?;

        Ok(result.modified_count)
    }
}
