//! Domain primitives, policies, and use-cases.
//!
//! Purpose: define the strongly typed entities, the ownership/deletion rules
//! and the orchestration service the adapters drive. Types stay transport
//! agnostic; invariants and serialisation contracts (serde) are documented in
//! each type's Rustdoc.

pub mod answer;
pub mod auth;
pub mod error;
pub mod forum_service;
pub mod policy;
pub mod ports;
pub mod question;
pub mod user;

pub use self::answer::{Answer, AnswerContents, AnswerId, AnswerValidationError};
pub use self::auth::{Caller, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::forum_service::ForumService;
pub use self::question::{Contents, Question, QuestionId, QuestionValidationError, Title};
pub use self::user::{LoginId, User, UserId, UserName, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use qna_backend::domain::{ApiResult, Error};
///
/// fn deny() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(deny().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
