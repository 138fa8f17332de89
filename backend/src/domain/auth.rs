//! Authentication primitives: login credentials and resolved caller identity.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::User;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login id was missing or blank once trimmed.
    EmptyLoginId,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLoginId => write!(f, "login id must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the identity provider.
///
/// ## Invariants
/// - `login_id` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use qna_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("javajigi", "test").unwrap();
/// assert_eq!(creds.login_id(), "javajigi");
/// assert_eq!(creds.password(), "test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login_id: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw login id/password inputs.
    pub fn try_from_parts(login_id: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = login_id.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyLoginId);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            login_id: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login id string suitable for account lookups.
    pub fn login_id(&self) -> &str {
        self.login_id.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Resolved request identity: an authenticated [`User`] or anonymous.
///
/// The ownership policy treats anonymous callers as owning nothing; the
/// orchestration layer additionally distinguishes a fully anonymous request
/// so it can report an authentication-required outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// No usable credentials accompanied the request.
    Anonymous,
    /// Credentials resolved to a known user.
    Authenticated(User),
}

impl Caller {
    /// The authenticated user, if any.
    pub const fn authenticated(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Whether the request carried no resolvable identity.
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<Option<User>> for Caller {
    fn from(value: Option<User>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}
