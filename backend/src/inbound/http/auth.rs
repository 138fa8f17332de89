//! Caller resolution for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! credential checks and identity derivation here. A request is authenticated
//! by the session cookie established via `POST /api/login`, or per request by
//! an `Authorization: Basic` header; both resolve through the identity port.

use actix_web::HttpRequest;
use actix_web::http::header;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::warn;

use crate::domain::ports::IdentityError;
use crate::domain::{Caller, Error, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the request's caller identity.
///
/// Resolution order: session cookie first, then the `Authorization: Basic`
/// header. A session id that no longer resolves degrades to anonymous (the
/// account may have been removed); Basic credentials that fail to resolve are
/// an authentication error, because the caller clearly attempted to identify.
pub async fn resolve_caller(
    state: &HttpState,
    session: &SessionContext,
    request: &HttpRequest,
) -> ApiResult<Caller> {
    if let Some(user_id) = session.user_id()? {
        match state
            .identity
            .find_by_id(user_id)
            .await
            .map_err(identity_error)?
        {
            Some(user) => return Ok(Caller::Authenticated(user)),
            None => warn!(%user_id, "session user id no longer resolves"),
        }
    }

    let Some(credentials) = basic_credentials(request)? else {
        return Ok(Caller::Anonymous);
    };
    match state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(identity_error)?
    {
        Some(user) => Ok(Caller::Authenticated(user)),
        None => Err(Error::auth_required("invalid credentials")),
    }
}

/// Extract credentials from an `Authorization: Basic` header, if present.
fn basic_credentials(request: &HttpRequest) -> ApiResult<Option<LoginCredentials>> {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::invalid_request("Authorization header must be valid ASCII"))?;
    let Some(encoded) = value.strip_prefix("Basic ") else {
        // Other schemes are not an identity attempt this API understands.
        return Ok(None);
    };

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| Error::invalid_request("Authorization header must be valid base64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| Error::invalid_request("Authorization header must be valid UTF-8"))?;
    let Some((login_id, password)) = decoded.split_once(':') else {
        return Err(Error::invalid_request(
            "Basic credentials must be login:password",
        ));
    };

    LoginCredentials::try_from_parts(login_id, password)
        .map(Some)
        .map_err(|_| Error::auth_required("invalid credentials"))
}

fn identity_error(err: IdentityError) -> Error {
    warn!(error = %err, "identity provider failure");
    Error::internal("identity provider failure")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn request_with_auth(value: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request()
    }

    #[test]
    fn absent_header_is_anonymous() {
        let request = TestRequest::default().to_http_request();
        let creds = basic_credentials(&request).expect("no header is fine");
        assert!(creds.is_none());
    }

    #[test]
    fn bearer_schemes_are_ignored() {
        let request = request_with_auth("Bearer some-token");
        let creds = basic_credentials(&request).expect("other schemes are fine");
        assert!(creds.is_none());
    }

    #[test]
    fn well_formed_basic_credentials_parse() {
        let encoded = BASE64.encode("javajigi:test");
        let request = request_with_auth(&format!("Basic {encoded}"));
        let creds = basic_credentials(&request)
            .expect("valid header")
            .expect("credentials present");
        assert_eq!(creds.login_id(), "javajigi");
        assert_eq!(creds.password(), "test");
    }

    #[rstest]
    #[case("Basic not-base64!!!")]
    #[case("Basic aGVsbG8=")] // decodes to "hello", no colon
    fn malformed_basic_headers_are_rejected(#[case] value: &str) {
        let request = request_with_auth(value);
        assert!(basic_credentials(&request).is_err());
    }

    #[test]
    fn empty_password_is_an_auth_failure() {
        let encoded = BASE64.encode("javajigi:");
        let request = request_with_auth(&format!("Basic {encoded}"));
        let err = basic_credentials(&request).expect_err("blank password");
        assert_eq!(err.code(), crate::domain::ErrorCode::AuthRequired);
    }
}
