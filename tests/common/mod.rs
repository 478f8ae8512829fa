#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use opinio_server::{
    errors::{AppError, AppResult},
    models::domain::{ProfileRecord, Question, Response, ResponseStatus},
    repositories::{ProfileRepository, QuestionCatalog, ResponseRepository},
    services::generation_client::TextGenerator,
};

pub fn valid_question(id: &str, category: &str, age_minutes: i64) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Que pensez-vous du sujet {} ?", id),
        category: category.to_string(),
        valid: true,
        refused: false,
        article_id: None,
        source_url: None,
        created_at: Utc::now() - Duration::minutes(age_minutes),
        validated_at: Some(Utc::now() - Duration::minutes(age_minutes)),
    }
}

pub fn historical_response(
    user_id: &str,
    question_id: &str,
    text: &str,
    age_minutes: i64,
) -> Response {
    let mut response = Response::answered(user_id, question_id, text);
    response.active = false;
    response.created_at = Utc::now() - Duration::minutes(age_minutes);
    response.modified_at = response.created_at;
    response
}

pub struct InMemoryQuestionCatalog {
    questions: Vec<Question>,
}

impl InMemoryQuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionCatalog for InMemoryQuestionCatalog {
    async fn list_valid_by_category(&self, category: &str) -> AppResult<Vec<Question>> {
        let needle = category.to_lowercase();
        Ok(self
            .questions
            .iter()
            .filter(|q| q.valid && q.category.to_lowercase() == needle)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.iter().find(|q| q.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryResponseRepository {
    rows: RwLock<Vec<Response>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, responses: Vec<Response>) {
        self.rows.write().await.extend(responses);
    }

    pub async fn all(&self) -> Vec<Response> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn get_active(&self, user_id: &str) -> AppResult<Vec<Response>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.active)
            .cloned()
            .collect())
    }

    async fn get_historical(&self, user_id: &str, limit: Option<i64>) -> AppResult<Vec<Response>> {
        let mut historical: Vec<Response> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && !r.active && r.status == ResponseStatus::Answered)
            .cloned()
            .collect();
        historical.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            historical.truncate(limit as usize);
        }
        Ok(historical)
    }

    async fn save(
        &self,
        user_id: &str,
        question_id: &str,
        text: Option<&str>,
    ) -> AppResult<Response> {
        let mut rows = self.rows.write().await;

        if let Some(existing) = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.question_id == question_id && r.active)
        {
            existing.text = text.map(str::to_string);
            existing.status = if text.is_some() {
                ResponseStatus::Answered
            } else {
                ResponseStatus::Skipped
            };
            existing.modified_at = Utc::now();
            return Ok(existing.clone());
        }

        let response = match text {
            Some(text) => Response::answered(user_id, question_id, text),
            None => Response::skipped(user_id, question_id),
        };
        rows.push(response.clone());
        Ok(response)
    }

    async fn deactivate_all(&self, user_id: &str) -> AppResult<u64> {
        let mut rows = self.rows.write().await;

        let active_questions: Vec<String> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.active)
            .map(|r| r.question_id.clone())
            .collect();

        rows.retain(|r| {
            !(r.user_id == user_id && !r.active && active_questions.contains(&r.question_id))
        });

        let mut count = 0;
        for row in rows.iter_mut().filter(|r| r.user_id == user_id && r.active) {
            row.active = false;
            count += 1;
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    records: RwLock<Vec<ProfileRecord>>,
    fail_saves: bool,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail_saves: true,
        }
    }

    pub async fn seed(&self, records: Vec<ProfileRecord>) {
        self.records.write().await.extend(records);
    }

    pub async fn all(&self) -> Vec<ProfileRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_current(&self, user_id: &str) -> AppResult<Option<ProfileRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.user_id == user_id && r.is_current)
            .cloned())
    }

    async fn list_all(&self, user_id: &str) -> AppResult<Vec<ProfileRecord>> {
        let mut records: Vec<ProfileRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn has_historical(&self, user_id: &str) -> AppResult<bool> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .any(|r| r.user_id == user_id && !r.is_current))
    }

    async fn save_new_current(&self, record: ProfileRecord) -> AppResult<ProfileRecord> {
        if self.fail_saves {
            return Err(AppError::DatabaseError(
                "profile store unavailable".to_string(),
            ));
        }

        let mut records = self.records.write().await;
        for existing in records
            .iter_mut()
            .filter(|r| r.user_id == record.user_id && r.is_current)
        {
            existing.is_current = false;
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn mark_all_historical(&self, user_id: &str) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut count = 0;
        for record in records
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.is_current)
        {
            record.is_current = false;
            count += 1;
        }
        Ok(count)
    }
}

/// A generation client fed a fixed script of replies. Running past the
/// script (or calling a client scripted with nothing) fails the test.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<AppResult<String>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn replying(replies: Vec<AppResult<String>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable_service() -> Self {
        Self::replying(vec![Err(AppError::GenerationUnavailable(
            "connection refused".to_string(),
        ))])
    }

    pub fn never_called() -> Self {
        Self::replying(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .await
            .pop_front()
            .expect("generation client called more times than scripted")
    }
}
