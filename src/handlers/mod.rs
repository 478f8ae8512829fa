use actix_web::{dev::Payload, get, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde_json::json;

use crate::errors::AppError;

pub mod profile_handler;
pub mod quiz_handler;

pub use profile_handler::{current_profile, profile_history, synthesize_profile};
pub use quiz_handler::{next_batch, reset_quiz, resume_quiz, submit_answers};

/// The caller's identity, taken from the `x-user-id` header. Authentication
/// itself lives outside this service; a real deployment puts an auth
/// middleware in front and this extractor is where its verified identity
/// enters the handlers.
pub struct UserId(pub String);

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        ready(match header {
            Some(user_id) => Ok(UserId(user_id.to_string())),
            None => Err(AppError::Unauthorized(
                "missing x-user-id header".to_string(),
            )),
        })
    }
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    async fn echo_user(user: UserId) -> HttpResponse {
        HttpResponse::Ok().body(user.0)
    }

    #[actix_web::test]
    async fn test_user_id_extractor_reads_header() {
        let app =
            test::init_service(App::new().route("/whoami", web::get().to(echo_user))).await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("x-user-id", "user-42"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "user-42");
    }

    #[actix_web::test]
    async fn test_user_id_extractor_rejects_missing_header() {
        let app =
            test::init_service(App::new().route("/whoami", web::get().to(echo_user))).await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
    }
}
