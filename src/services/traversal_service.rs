use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::Serialize;

use crate::{
    constants::categories::{self, CATEGORIES},
    errors::{AppError, AppResult},
    models::domain::{Question, QuizProgress},
    models::dto::request::{AnswerInput, Directive},
    repositories::{QuestionCatalog, ResponseRepository},
};

/// At most this many questions are presented per category visit.
pub const BATCH_SIZE: usize = 5;
/// Below this count the backfill tiers kick in.
const MIN_BATCH_FILL: usize = 3;
/// How many previously-answered questions a follow-up batch may revisit.
const REVISIT_LIMIT: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub enum TraversalStep {
    Batch {
        category: String,
        questions: Vec<Question>,
    },
    Completed {
        reason: CompletionReason,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Every category ran out of presentable questions. This is the
    /// expected terminal state, never an error.
    Exhausted,
    /// The user asked to finish early.
    Requested,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionOutcome {
    Paused,
    Advanced { category: String },
    Completed { reason: CompletionReason },
}

/// The Category Traversal Controller: decides which questions to present
/// next and records submitted answers, never presenting a question the user
/// already handled in the active response set.
pub struct TraversalService {
    questions: Arc<dyn QuestionCatalog>,
    responses: Arc<dyn ResponseRepository>,
}

impl TraversalService {
    pub fn new(questions: Arc<dyn QuestionCatalog>, responses: Arc<dyn ResponseRepository>) -> Self {
        Self { questions, responses }
    }

    /// Returns the next question batch, starting at `requested` (or the
    /// category already underway), advancing round-robin past exhausted
    /// categories. All categories empty (including an entirely empty
    /// catalog) signals completion.
    pub async fn next_batch(
        &self,
        user_id: &str,
        requested: Option<&str>,
        progress: &mut QuizProgress,
    ) -> AppResult<TraversalStep> {
        let start = requested
            .map(str::to_string)
            .or_else(|| progress.current_category.clone())
            .unwrap_or_else(|| CATEGORIES[0].to_string());

        let start_idx = categories::position(&start)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown category '{}'", start)))?;

        for offset in 0..CATEGORIES.len() {
            let category = CATEGORIES[(start_idx + offset) % CATEGORIES.len()];
            if progress.is_exhausted(category) {
                continue;
            }

            let questions = self
                .select_for_category(user_id, category, progress.follow_up)
                .await?;
            if questions.is_empty() {
                progress.mark_exhausted(category);
                continue;
            }

            progress.current_category = Some(category.to_string());
            return Ok(TraversalStep::Batch {
                category: category.to_string(),
                questions,
            });
        }

        log::info!("No presentable questions left for user {}; quiz complete", user_id);
        progress.clear_traversal();
        Ok(TraversalStep::Completed {
            reason: CompletionReason::Exhausted,
        })
    }

    /// Returns a paused traversal to its last category with the exhausted
    /// set intact; without usable resume data this starts from the top.
    pub async fn resume(
        &self,
        user_id: &str,
        progress: &mut QuizProgress,
    ) -> AppResult<TraversalStep> {
        if progress.paused {
            let last = progress.last_category.clone();
            if let Some(last) = last.filter(|c| categories::is_known(c)) {
                progress.paused = false;
                return self.next_batch(user_id, Some(&last), progress).await;
            }
            progress.clear_traversal();
        }

        self.next_batch(user_id, None, progress).await
    }

    /// Persists the submitted answers and skips, then acts on the directive.
    /// A submission carrying neither new input nor a pause/finish directive
    /// is rejected so the caller can retry with input.
    pub async fn submit(
        &self,
        user_id: &str,
        category: &str,
        answers: &[AnswerInput],
        directive: Directive,
        progress: &mut QuizProgress,
    ) -> AppResult<SubmissionOutcome> {
        if !categories::is_known(category) {
            return Err(AppError::ValidationError(format!(
                "Unknown category '{}'",
                category
            )));
        }

        let mut saved = 0usize;
        for input in answers {
            if input.skip {
                self.responses.save(user_id, &input.question_id, None).await?;
                saved += 1;
            } else if let Some(text) = input
                .answer
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
            {
                self.responses
                    .save(user_id, &input.question_id, Some(text))
                    .await?;
                saved += 1;
            }
        }

        if saved == 0 && directive == Directive::Continue {
            return Err(AppError::ValidationError(
                "at least one answer or skip is required to continue".to_string(),
            ));
        }

        log::debug!(
            "User {} saved {} response(s) in category '{}'",
            user_id,
            saved,
            category
        );

        match directive {
            Directive::SaveAndPause => {
                progress.pause(category);
                Ok(SubmissionOutcome::Paused)
            }
            Directive::Finish => {
                progress.clear_traversal();
                Ok(SubmissionOutcome::Completed {
                    reason: CompletionReason::Requested,
                })
            }
            Directive::Continue => {
                // A visited category is not revisited within this traversal.
                progress.mark_exhausted(category);

                match self.advance_after(user_id, category, progress).await? {
                    Some(next) => {
                        progress.current_category = Some(next.clone());
                        Ok(SubmissionOutcome::Advanced { category: next })
                    }
                    None => {
                        progress.clear_traversal();
                        Ok(SubmissionOutcome::Completed {
                            reason: CompletionReason::Exhausted,
                        })
                    }
                }
            }
        }
    }

    /// Deactivates the user's active responses ahead of a retake.
    pub async fn reset_responses(&self, user_id: &str) -> AppResult<u64> {
        let deactivated = self.responses.deactivate_all(user_id).await?;
        log::info!(
            "Deactivated {} response(s) for user {} before retake",
            deactivated,
            user_id
        );
        Ok(deactivated)
    }

    /// Round-robin scan after `category` for the next category that still
    /// has at least one question outside the active response set. Categories
    /// found empty are marked exhausted along the way.
    async fn advance_after(
        &self,
        user_id: &str,
        category: &str,
        progress: &mut QuizProgress,
    ) -> AppResult<Option<String>> {
        let active = self.responses.get_active(user_id).await?;
        let avoided: HashSet<String> = active.into_iter().map(|r| r.question_id).collect();

        let start = categories::position(category).unwrap_or(0);
        for offset in 1..=CATEGORIES.len() {
            let next = CATEGORIES[(start + offset) % CATEGORIES.len()];
            if progress.is_exhausted(next) {
                continue;
            }

            let pool = self.questions.list_valid_by_category(next).await?;
            if pool.iter().any(|q| !avoided.contains(&q.id)) {
                return Ok(Some(next.to_string()));
            }
            progress.mark_exhausted(next);
        }

        Ok(None)
    }

    /// Builds one category's batch in three tiers: never-seen questions
    /// newest-first, then (on follow-up runs) a couple of previously
    /// answered ones in random order, then any remaining unanswered
    /// questions in random order. Questions in the active response set are
    /// excluded outright at every tier.
    async fn select_for_category(
        &self,
        user_id: &str,
        category: &str,
        follow_up: bool,
    ) -> AppResult<Vec<Question>> {
        let active = self.responses.get_active(user_id).await?;
        let avoided: HashSet<String> = active.into_iter().map(|r| r.question_id).collect();

        let historical: HashSet<String> = if follow_up {
            self.responses
                .get_historical(user_id, None)
                .await?
                .into_iter()
                .map(|r| r.question_id)
                .collect()
        } else {
            HashSet::new()
        };

        let pool = self.questions.list_valid_by_category(category).await?;

        let mut fresh: Vec<Question> = pool
            .iter()
            .filter(|q| !avoided.contains(&q.id) && !historical.contains(&q.id))
            .cloned()
            .collect();
        fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut batch: Vec<Question> = fresh.into_iter().take(BATCH_SIZE).collect();

        if batch.len() < MIN_BATCH_FILL && follow_up {
            let picked: HashSet<String> = batch.iter().map(|q| q.id.clone()).collect();
            let mut revisit: Vec<Question> = pool
                .iter()
                .filter(|q| {
                    !avoided.contains(&q.id)
                        && historical.contains(&q.id)
                        && !picked.contains(&q.id)
                })
                .cloned()
                .collect();
            revisit.shuffle(&mut thread_rng());
            batch.extend(revisit.into_iter().take(REVISIT_LIMIT));
        }

        if batch.len() < MIN_BATCH_FILL {
            let picked: HashSet<String> = batch.iter().map(|q| q.id.clone()).collect();
            let mut filler: Vec<Question> = pool
                .into_iter()
                .filter(|q| !avoided.contains(&q.id) && !picked.contains(&q.id))
                .collect();
            filler.shuffle(&mut thread_rng());
            let room = BATCH_SIZE - batch.len();
            batch.extend(filler.into_iter().take(room));
        }

        Ok(batch)
    }
}
