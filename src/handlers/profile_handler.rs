use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::UserId,
    models::dto::{
        request::SynthesizeRequest,
        response::{SynthesisDto, SynthesisResponse},
    },
};

/// Runs the synthesis pipeline outside the submit flow (e.g. after an
/// explicit "finish now"). Always answers 200 with a usable analysis; the
/// `persisted` flag tells the caller whether the save went through.
#[post("/api/profiles/synthesize")]
pub async fn synthesize_profile(
    state: web::Data<AppState>,
    user: UserId,
    request: web::Json<SynthesizeRequest>,
) -> Result<HttpResponse, AppError> {
    let mut progress = request.into_inner().progress;

    let outcome = state
        .synthesis_service
        .synthesize(&user.0, progress.follow_up)
        .await;

    progress.clear_traversal();
    progress.follow_up = false;

    Ok(HttpResponse::Ok().json(SynthesisResponse {
        result: SynthesisDto::from(outcome),
        progress,
    }))
}

#[get("/api/profiles/current")]
pub async fn current_profile(
    state: web::Data<AppState>,
    user: UserId,
) -> Result<HttpResponse, AppError> {
    let profile = state
        .synthesis_service
        .current_profile(&user.0)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user '{}'", user.0)))?;

    Ok(HttpResponse::Ok().json(profile))
}

#[get("/api/profiles/history")]
pub async fn profile_history(
    state: web::Data<AppState>,
    user: UserId,
) -> Result<HttpResponse, AppError> {
    let profiles = state.synthesis_service.profile_history(&user.0).await?;
    Ok(HttpResponse::Ok().json(profiles))
}
