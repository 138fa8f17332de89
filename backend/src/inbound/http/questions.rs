//! Questions API handlers.
//!
//! ```text
//! GET    /api/questions                 List non-deleted questions
//! GET    /api/questions/{id}            Question detail with answers
//! POST   /api/questions                 Create (authenticated)
//! PUT    /api/questions/{id}            Update title/contents (owner only)
//! DELETE /api/questions/{id}            Cascading soft delete (rule engine)
//! POST   /api/questions/{id}/answers    Attach an answer (authenticated)
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Answer, AnswerContents, AnswerId, AnswerValidationError, Contents, Error, Question,
    QuestionId, QuestionValidationError, Title,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::resolve_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Question transfer object accepted by create and update.
///
/// Example JSON: `{"title":"title","contents":"contents"}`
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    /// Question title.
    pub title: String,
    /// Question body.
    pub contents: String,
}

impl QuestionPayload {
    fn into_fields(self) -> ApiResult<(Title, Contents)> {
        let title = Title::new(self.title).map_err(map_question_validation_error)?;
        let contents = Contents::new(self.contents).map_err(map_question_validation_error)?;
        Ok((title, contents))
    }
}

/// Answer transfer object accepted by answer creation.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    /// Answer body.
    pub contents: String,
}

fn map_question_validation_error(err: QuestionValidationError) -> Error {
    let (message, field, code) = match &err {
        QuestionValidationError::EmptyTitle => {
            ("title must not be empty", "title", "empty_title")
        }
        QuestionValidationError::TitleTooLong { .. } => {
            ("title is too long", "title", "title_too_long")
        }
        QuestionValidationError::EmptyContents => {
            ("contents must not be empty", "contents", "empty_contents")
        }
        // Embedded entities never come from payloads.
        QuestionValidationError::InvalidAuthor(_) | QuestionValidationError::InvalidAnswer(_) => {
            return Error::invalid_request(err.to_string());
        }
    };
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn map_answer_validation_error(err: AnswerValidationError) -> Error {
    match &err {
        AnswerValidationError::EmptyContents => {
            Error::invalid_request("contents must not be empty")
                .with_details(json!({ "field": "contents", "code": "empty_contents" }))
        }
        AnswerValidationError::InvalidAuthor(_) => Error::invalid_request(err.to_string()),
    }
}

/// List non-deleted questions in stable insertion order.
#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "Questions", body = [Question]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "listQuestions",
    security([])
)]
#[get("/questions")]
pub async fn list_questions(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Question>>> {
    let questions = state.forum.list_questions().await?;
    Ok(web::Json(questions))
}

/// Fetch a single question with its answers.
#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(("id" = i64, Path, description = "Question identifier")),
    responses(
        (status = 200, description = "Question", body = Question),
        (status = 404, description = "Unknown or deleted question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "questionDetail",
    security([])
)]
#[get("/questions/{id}")]
pub async fn question_detail(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Question>> {
    let question = state
        .forum
        .question(QuestionId::new(path.into_inner()))
        .await?;
    Ok(web::Json(question))
}

/// Create a question authored by the caller.
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = QuestionPayload,
    responses(
        (status = 201, description = "Question created", body = Question,
            headers(("Location" = String, description = "URI of the created question"))),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Authentication required", body = Error)
    ),
    tags = ["questions"],
    operation_id = "createQuestion"
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<QuestionPayload>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&state, &session, &request).await?;
    let (title, contents) = payload.into_inner().into_fields()?;
    let question = state.forum.create_question(&caller, title, contents).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, question_uri(question.id())))
        .json(question))
}

/// Replace the title and contents of an owned question.
#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    params(("id" = i64, Path, description = "Question identifier")),
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Updated question", body = Question),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Caller is not the author", body = Error),
        (status = 404, description = "Unknown or deleted question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion"
)]
#[put("/questions/{id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<QuestionPayload>,
) -> ApiResult<web::Json<Question>> {
    let caller = resolve_caller(&state, &session, &request).await?;
    let (title, contents) = payload.into_inner().into_fields()?;
    let question = state
        .forum
        .update_question(&caller, QuestionId::new(path.into_inner()), title, contents)
        .await?;
    Ok(web::Json(question))
}

/// Delete a question and all its answers, subject to the deletion rules.
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(("id" = i64, Path, description = "Question identifier")),
    responses(
        (status = 204, description = "Question and answers deleted"),
        (status = 403, description = "Not the author, or a foreign answer exists", body = Error),
        (status = 404, description = "Unknown or deleted question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion"
)]
#[delete("/questions/{id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&state, &session, &request).await?;
    state
        .forum
        .delete_question(&caller, QuestionId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach an answer to an existing question.
#[utoipa::path(
    post,
    path = "/api/questions/{id}/answers",
    params(("id" = i64, Path, description = "Parent question identifier")),
    request_body = AnswerPayload,
    responses(
        (status = 201, description = "Answer created", body = Answer,
            headers(("Location" = String, description = "URI of the created answer"))),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 403, description = "Authentication required", body = Error),
        (status = 404, description = "Unknown or deleted question", body = Error)
    ),
    tags = ["questions"],
    operation_id = "createAnswer"
)]
#[post("/questions/{id}/answers")]
pub async fn create_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<AnswerPayload>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_caller(&state, &session, &request).await?;
    let contents =
        AnswerContents::new(payload.into_inner().contents).map_err(map_answer_validation_error)?;
    let answer = state
        .forum
        .create_answer(&caller, QuestionId::new(path.into_inner()), contents)
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, answer_uri(answer.id())))
        .json(answer))
}

pub(crate) fn question_uri(id: QuestionId) -> String {
    format!("/api/questions/{id}")
}

pub(crate) fn answer_uri(id: AnswerId) -> String {
    format!("/api/answers/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, test_app};
    use actix_web::{http::StatusCode, test as actix_test};
    use serde_json::Value;

    fn question_json(title: &str, contents: &str) -> Value {
        json!({ "title": title, "contents": contents })
    }

    async fn create_via_session(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
    ) -> String {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/questions")
                .cookie(cookie.clone())
                .set_json(question_json("title", "contents"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("Location header")
            .to_owned()
    }

    #[actix_web::test]
    async fn listing_starts_empty_and_needs_no_auth() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/questions")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value, json!([]));
    }

    #[actix_web::test]
    async fn unknown_question_detail_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/questions/999")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_returns_location_and_body() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &cookie).await;
        assert_eq!(location, "/api/questions/1");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(&location).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value.get("title").and_then(Value::as_str), Some("title"));
        assert_eq!(
            value
                .get("author")
                .and_then(|author| author.get("loginId"))
                .and_then(Value::as_str),
            Some("javajigi")
        );
    }

    #[actix_web::test]
    async fn anonymous_create_is_forbidden_and_creates_nothing() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/questions")
                .set_json(question_json("title", "contents"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/questions")
                .to_request(),
        )
        .await;
        let value: Value = actix_test::read_body_json(listing).await;
        assert_eq!(value, json!([]));
    }

    #[actix_web::test]
    async fn blank_title_is_a_bad_request() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/questions")
                .cookie(cookie)
                .set_json(question_json("   ", "contents"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value
                .get("details")
                .and_then(|details| details.get("field"))
                .and_then(Value::as_str),
            Some("title")
        );
    }

    #[actix_web::test]
    async fn owner_updates_and_reads_back_the_change() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &cookie).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&location)
                .cookie(cookie.clone())
                .set_json(question_json("title2", "contents2"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value.get("title").and_then(Value::as_str), Some("title2"));
    }

    #[actix_web::test]
    async fn non_owner_update_is_forbidden() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &owner).await;

        let intruder = login_cookie(&app, "sanjigi", "test2").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&location)
                .cookie(intruder)
                .set_json(question_json("title2", "contents2"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value.get("code").and_then(Value::as_str), Some("forbidden"));
    }

    #[actix_web::test]
    async fn owner_delete_without_answers_is_no_content() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &cookie).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&location)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let gone = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(&location).to_request(),
        )
        .await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn foreign_answer_blocks_question_delete() {
        let app = actix_test::init_service(test_app()).await;
        let owner = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &owner).await;

        let answerer = login_cookie(&app, "sanjigi", "test2").await;
        let answered = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("{location}/answers"))
                .cookie(answerer)
                .set_json(json!({ "contents": "an answer" }))
                .to_request(),
        )
        .await;
        assert_eq!(answered.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&location)
                .cookie(owner)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn answers_on_missing_questions_are_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/questions/999/answers")
                .cookie(cookie)
                .set_json(json!({ "contents": "an answer" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn answer_creation_points_at_the_answer_resource() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login_cookie(&app, "javajigi", "test").await;
        let location = create_via_session(&app, &cookie).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("{location}/answers"))
                .cookie(cookie)
                .set_json(json!({ "contents": "an answer" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let answer_location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("Location header");
        assert_eq!(answer_location, "/api/answers/1");
    }
}
