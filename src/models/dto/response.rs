use serde::Serialize;

use crate::{
    models::domain::{ProfileFields, Question, QuizProgress},
    services::{
        synthesis_service::{AnalysisSource, SynthesisOutcome},
        traversal_service::{SubmissionOutcome, TraversalStep},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    pub text: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            text: question.text,
            category: question.category,
            source_url: question.source_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextBatchResponse {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub questions: Vec<QuestionDto>,
    pub progress: QuizProgress,
}

impl NextBatchResponse {
    pub fn from_step(step: TraversalStep, progress: QuizProgress) -> Self {
        match step {
            TraversalStep::Batch {
                category,
                questions,
            } => NextBatchResponse {
                completed: false,
                category: Some(category),
                questions: questions.into_iter().map(QuestionDto::from).collect(),
                progress,
            },
            TraversalStep::Completed { .. } => NextBatchResponse {
                completed: true,
                category: None,
                questions: Vec::new(),
                progress,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SynthesisDto {
    pub analysis: String,
    pub fields: ProfileFields,
    pub source: AnalysisSource,
    pub persisted: bool,
}

impl From<SynthesisOutcome> for SynthesisDto {
    fn from(outcome: SynthesisOutcome) -> Self {
        SynthesisDto {
            analysis: outcome.analysis,
            fields: outcome.fields,
            source: outcome.source,
            persisted: outcome.persisted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// "paused", "advanced" or "completed".
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_category: Option<String>,
    /// Present when the submission completed the quiz: the freshly
    /// synthesized profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<SynthesisDto>,
    pub progress: QuizProgress,
}

impl SubmissionResponse {
    pub fn from_outcome(
        outcome: SubmissionOutcome,
        profile: Option<SynthesisDto>,
        progress: QuizProgress,
    ) -> Self {
        match outcome {
            SubmissionOutcome::Paused => SubmissionResponse {
                outcome: "paused",
                next_category: None,
                profile,
                progress,
            },
            SubmissionOutcome::Advanced { category } => SubmissionResponse {
                outcome: "advanced",
                next_category: Some(category),
                profile,
                progress,
            },
            SubmissionOutcome::Completed { .. } => SubmissionResponse {
                outcome: "completed",
                next_category: None,
                profile,
                progress,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SynthesisResponse {
    #[serde(flatten)]
    pub result: SynthesisDto,
    pub progress: QuizProgress,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub deactivated_responses: u64,
    pub retired_profiles: u64,
    pub progress: QuizProgress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::traversal_service::CompletionReason;

    #[test]
    fn completed_step_maps_to_empty_batch() {
        let response = NextBatchResponse::from_step(
            TraversalStep::Completed {
                reason: CompletionReason::Exhausted,
            },
            QuizProgress::fresh(),
        );

        assert!(response.completed);
        assert!(response.category.is_none());
        assert!(response.questions.is_empty());
    }

    #[test]
    fn advanced_outcome_carries_next_category() {
        let response = SubmissionResponse::from_outcome(
            SubmissionOutcome::Advanced {
                category: "Santé".to_string(),
            },
            None,
            QuizProgress::fresh(),
        );

        assert_eq!(response.outcome, "advanced");
        assert_eq!(response.next_category.as_deref(), Some("Santé"));
        let json = serde_json::to_value(&response).expect("should serialize");
        assert!(json.get("profile").is_none());
    }
}
