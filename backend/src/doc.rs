//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (questions,
//!   answers, session, health)
//! - **Schemas**: Domain types and transfer objects
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Answer, Error, ErrorCode, Question, User};
use crate::inbound::http::questions::{AnswerPayload, QuestionPayload};
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Q&A forum backend API",
        description = "HTTP interface for questions, answers, and session-authenticated access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::question_detail,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::questions::create_answer,
        crate::inbound::http::answers::delete_answer,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Question,
        Answer,
        User,
        QuestionPayload,
        AnswerPayload,
        LoginRequest,
        Error,
        ErrorCode
    )),
    tags(
        (name = "questions", description = "Question CRUD and answer creation"),
        (name = "answers", description = "Answer deletion"),
        (name = "users", description = "Session management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
