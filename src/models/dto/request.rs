use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::QuizProgress;

/// What to do after the submitted answers are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// Persist and advance to the next category.
    #[default]
    Continue,
    /// Persist what was given (possibly nothing) and record resume state.
    SaveAndPause,
    /// Persist and end the quiz now, regardless of remaining categories.
    Finish,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1))]
    pub question_id: String,
    /// Free-text answer; ignored when `skip` is set.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub directive: Directive,
    #[serde(default)]
    pub progress: QuizProgress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextBatchRequest {
    #[serde(default)]
    pub progress: QuizProgress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub progress: QuizProgress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub progress: QuizProgress,
}
