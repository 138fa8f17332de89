//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ForumService;
use crate::domain::ports::FixtureIdentityProvider;
use crate::inbound::http::answers::delete_answer;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::questions::{
    create_answer, create_question, delete_question, list_questions, question_detail,
    update_question,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, logout};
use crate::middleware::Trace;
use crate::outbound::persistence::MemoryQuestionRepository;

/// Dependency bundle handed to each application factory invocation.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler state (service + ports).
    pub state: web::Data<HttpState>,
    /// Readiness/liveness state shared with probes.
    pub health: web::Data<HealthState>,
    /// Session cookie signing/encryption key.
    pub key: Key,
    /// Whether session cookies require HTTPS.
    pub cookie_secure: bool,
    /// `SameSite` policy applied to session cookies.
    pub same_site: SameSite,
}

/// Build handler state over the in-memory store and the seeded fixture
/// accounts.
///
/// Durable persistence is an adapter concern behind
/// [`crate::domain::ports::QuestionRepository`]; the default wiring keeps all
/// entities in process memory.
pub fn default_state() -> HttpState {
    let forum = Arc::new(ForumService::new(Arc::new(
        MemoryQuestionRepository::new(),
    )));
    HttpState::new(forum, Arc::new(FixtureIdentityProvider::default()))
}

/// Assemble the application: middleware, session handling, and routes.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        state,
        health,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(list_questions)
        .service(question_detail)
        .service(create_question)
        .service(update_question)
        .service(delete_question)
        .service(create_answer)
        .service(delete_answer);

    let app = App::new()
        .app_data(state)
        .app_data(health)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind and start the HTTP server, marking readiness once bound.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(default_state());
    let health = web::Data::new(HealthState::new());
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let factory_state = state.clone();
    let factory_health = health.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            state: factory_state.clone(),
            health: factory_health.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health.mark_ready();
    Ok(server)
}
