use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::UserId,
    models::domain::QuizProgress,
    models::dto::{
        request::{NextBatchRequest, ResumeRequest, SubmitAnswersRequest},
        response::{NextBatchResponse, ResetResponse, SubmissionResponse, SynthesisDto},
    },
    services::traversal_service::SubmissionOutcome,
};

/// Returns the next question batch for the traversal carried in the body,
/// or signals completion when every category is exhausted.
#[post("/api/quiz/next")]
pub async fn next_batch(
    state: web::Data<AppState>,
    user: UserId,
    request: web::Json<NextBatchRequest>,
) -> Result<HttpResponse, AppError> {
    let mut progress = request.into_inner().progress;
    let step = state
        .traversal_service
        .next_batch(&user.0, None, &mut progress)
        .await?;

    Ok(HttpResponse::Ok().json(NextBatchResponse::from_step(step, progress)))
}

/// Returns a paused traversal to its last category, restoring the
/// exhausted-category state recorded at pause time.
#[post("/api/quiz/resume")]
pub async fn resume_quiz(
    state: web::Data<AppState>,
    user: UserId,
    request: web::Json<ResumeRequest>,
) -> Result<HttpResponse, AppError> {
    let mut progress = request.into_inner().progress;
    let step = state
        .traversal_service
        .resume(&user.0, &mut progress)
        .await?;

    Ok(HttpResponse::Ok().json(NextBatchResponse::from_step(step, progress)))
}

/// Persists a category's answers and acts on the directive. When the
/// submission completes the quiz, control passes straight to the synthesis
/// pipeline and the fresh profile rides along in the response.
#[post("/api/quiz/{category}/answers")]
pub async fn submit_answers(
    state: web::Data<AppState>,
    user: UserId,
    category: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let SubmitAnswersRequest {
        answers,
        directive,
        mut progress,
    } = request;

    let outcome = state
        .traversal_service
        .submit(&user.0, &category, &answers, directive, &mut progress)
        .await?;

    let profile = if matches!(outcome, SubmissionOutcome::Completed { .. }) {
        let synthesis = state
            .synthesis_service
            .synthesize(&user.0, progress.follow_up)
            .await;
        progress.follow_up = false;
        Some(SynthesisDto::from(synthesis))
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(SubmissionResponse::from_outcome(outcome, profile, progress)))
}

/// Starts a retake: active responses become historical, the current profile
/// is retired, and the returned progress carries the follow-up flag.
#[post("/api/quiz/reset")]
pub async fn reset_quiz(
    state: web::Data<AppState>,
    user: UserId,
) -> Result<HttpResponse, AppError> {
    let deactivated_responses = state.traversal_service.reset_responses(&user.0).await?;
    let retired_profiles = state
        .synthesis_service
        .retire_current_profile(&user.0)
        .await?;

    Ok(HttpResponse::Ok().json(ResetResponse {
        deactivated_responses,
        retired_profiles,
        progress: QuizProgress::follow_up(),
    }))
}
