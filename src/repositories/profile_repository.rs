use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::ProfileRecord};

/// The Profile Record Store. Exactly one record per user is current; the
/// rest form the retake history.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The current record, or the newest one (promoted to current) when no
    /// record carries the flag. A crash between flip and insert can leave
    /// zero current records, and this read heals that state.
    async fn get_current(&self, user_id: &str) -> AppResult<Option<ProfileRecord>>;
    /// All records for the user, newest first.
    async fn list_all(&self, user_id: &str) -> AppResult<Vec<ProfileRecord>>;
    async fn has_historical(&self, user_id: &str) -> AppResult<bool>;
    /// Flips any previously-current record to historical, then inserts the
    /// new record as current.
    async fn save_new_current(&self, record: ProfileRecord) -> AppResult<ProfileRecord>;
    /// Demotes every current record to historical. Returns the flipped count.
    async fn mark_all_historical(&self, user_id: &str) -> AppResult<u64>;
}

pub struct MongoProfileRepository {
    collection: Collection<ProfileRecord>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("profiles");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for profiles collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(id_index).await?;

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "is_current": 1 })
            .options(IndexOptions::builder().name("user_current".to_string()).build())
            .build();
        self.collection.create_index(user_index).await?;

        log::info!("Successfully created indexes for profiles collection");
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn get_current(&self, user_id: &str) -> AppResult<Option<ProfileRecord>> {
        let current = self
            .collection
            .find_one(doc! { "user_id": user_id, "is_current": true })
            .await?;

        if current.is_some() {
            return Ok(current);
        }

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(1)
            .build();
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .with_options(find_options)
            .await?;
        let newest: Vec<ProfileRecord> = cursor.try_collect().await?;

        match newest.into_iter().next() {
            Some(mut record) => {
                self.collection
                    .update_one(
                        doc! { "id": &record.id },
                        doc! { "$set": { "is_current": true } },
                    )
                    .await?;
                record.is_current = true;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn list_all(&self, user_id: &str) -> AppResult<Vec<ProfileRecord>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .with_options(find_options)
            .await?;
        let records: Vec<ProfileRecord> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn has_historical(&self, user_id: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "is_current": false })
            .await?;
        Ok(count > 0)
    }

    async fn save_new_current(&self, record: ProfileRecord) -> AppResult<ProfileRecord> {
        self.collection
            .update_many(
                doc! { "user_id": &record.user_id, "is_current": true },
                doc! { "$set": { "is_current": false } },
            )
            .await?;

        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn mark_all_historical(&self, user_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "user_id": user_id, "is_current": true },
                doc! { "$set": { "is_current": false } },
            )
            .await?;
        Ok(result.modified_count)
    }
}
