//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and use-cases and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ForumService;
use crate::domain::ports::IdentityProvider;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Question/answer use-cases.
    pub forum: Arc<ForumService>,
    /// Credential and session identity resolution.
    pub identity: Arc<dyn IdentityProvider>,
}

impl HttpState {
    /// Construct state from the core service and identity port.
    pub fn new(forum: Arc<ForumService>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { forum, identity }
    }
}
