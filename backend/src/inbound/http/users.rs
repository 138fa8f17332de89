//! Session API handlers.
//!
//! ```text
//! POST /api/login {"loginId":"javajigi","password":"test"}
//! POST /api/logout
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/login`.
///
/// Example JSON:
/// `{"loginId":"javajigi","password":"test"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account login handle.
    pub login_id: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.login_id, &value.password)
    }
}

/// Authenticate credentials and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent error
/// schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(|err| Error::internal(format!("identity provider failure: {err}")))?
        .ok_or_else(|| Error::auth_required("invalid credentials"))?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().finish())
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyLoginId => Error::invalid_request("login id must not be empty")
            .with_details(json!({ "field": "loginId", "code": "empty_login_id" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// End the current session, if any.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 204, description = "Session ended")
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
