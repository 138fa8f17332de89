//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::domain::ForumService;
use crate::domain::ports::FixtureIdentityProvider;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::MemoryQuestionRepository;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state over an empty in-memory store and the seeded
/// fixture accounts.
pub fn test_state() -> HttpState {
    let forum = Arc::new(ForumService::new(Arc::new(
        MemoryQuestionRepository::new(),
    )));
    HttpState::new(forum, Arc::new(FixtureIdentityProvider::default()))
}

/// Fully wired test application: session middleware plus every `/api` route.
pub fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(test_state()))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(crate::inbound::http::users::login)
                .service(crate::inbound::http::users::logout)
                .service(crate::inbound::http::questions::list_questions)
                .service(crate::inbound::http::questions::question_detail)
                .service(crate::inbound::http::questions::create_question)
                .service(crate::inbound::http::questions::update_question)
                .service(crate::inbound::http::questions::delete_question)
                .service(crate::inbound::http::questions::create_answer)
                .service(crate::inbound::http::answers::delete_answer),
        )
}

/// Log in through the real endpoint and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    login_id: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/login")
        .set_json(serde_json::json!({ "loginId": login_id, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login must succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Build an `Authorization: Basic` header pair for the given account.
pub fn basic_auth(login_id: &str, password: &str) -> (header::HeaderName, String) {
    let encoded = BASE64.encode(format!("{login_id}:{password}"));
    (header::AUTHORIZATION, format!("Basic {encoded}"))
}
