//! Answers API handlers.
//!
//! ```text
//! DELETE /api/answers/{id}    Soft delete a single answer (owner only)
//! ```
//!
//! Answers are created through their parent question
//! (`POST /api/questions/{id}/answers`); the `Location` header returned
//! there points at this resource.

use actix_web::{HttpRequest, HttpResponse, delete, web};

use crate::domain::AnswerId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Delete a single answer the caller owns.
#[utoipa::path(
    delete,
    path = "/api/answers/{id}",
    params(("id" = i64, Path, description = "Answer identifier")),
    responses(
        (status = 204, description = "Answer deleted"),
        (status = 403, description = "Caller is not the author", body = crate::domain::Error),
        (status = 404, description = "Unknown or deleted answer", body = crate::domain::Error)
    ),
    tags = ["answers"],
    operation_id = "deleteAnswer"
)]
#[delete("/answers/{id}")]
pub async fn delete_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&state, &session, &request).await?;
    state
        .forum
        .delete_answer(&caller, AnswerId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{login_cookie, test_app};
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use serde_json::json;

    async fn seed_answer(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        owner: &actix_web::cookie::Cookie<'static>,
        answerer: &actix_web::cookie::Cookie<'static>,
    ) -> String {
        let created = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/questions")
                .cookie(owner.clone())
                .set_json(json!({ "title": "title", "contents": "contents" }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let question_uri = created
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("Location header")
            .to_owned();

        let answered = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri(&format!("{question_uri}/answers"))
                .cookie(answerer.clone())
                .set_json(json!({ "contents": "an answer" }))
                .to_request(),
        )
        .await;
        assert_eq!(answered.status(), StatusCode::CREATED);
        answered
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("Location header")
            .to_owned()
    }

    #[actix_web::test]
    async fn owner_deletes_their_answer() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let answer_uri = seed_answer(&app, &owner, &owner).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&answer_uri)
                .cookie(owner)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn non_owner_delete_is_forbidden() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let answerer = login_cookie(&app, "sanjigi", "test2").await;
        let answer_uri = seed_answer(&app, &owner, &answerer).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&answer_uri)
                .cookie(owner)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn deleting_twice_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let answer_uri = seed_answer(&app, &owner, &owner).await;

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&answer_uri)
                .cookie(owner.clone())
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&answer_uri)
                .cookie(owner)
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn anonymous_delete_is_forbidden() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let answer_uri = seed_answer(&app, &owner, &owner).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&answer_uri)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
