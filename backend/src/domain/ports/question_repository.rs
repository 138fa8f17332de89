//! Port abstraction for question/answer storage adapters and their errors.
//!
//! In hexagonal terms this is a *driven* port: the forum service talks to it
//! without knowing the backing infrastructure. Adapters must provide
//! per-entity read-then-write atomicity — in particular, the cascading
//! question delete is one state transition, never two observable writes.

use async_trait::async_trait;

use crate::domain::answer::{Answer, AnswerContents, AnswerId};
use crate::domain::question::{Contents, Question, QuestionId, Title};
use crate::domain::User;

/// Storage errors raised by question repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionStoreError {
    /// Storage backend could not be reached.
    #[error("question store unavailable: {message}")]
    Unavailable {
        /// Adapter-specific failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("question store query failed: {message}")]
    Query {
        /// Adapter-specific failure description.
        message: String,
    },
}

/// Storage port for questions and their answers.
///
/// Snapshots returned by read operations carry the non-deleted answers of a
/// question in insertion (id) order; deleted entities are reported as absent.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All non-deleted questions in insertion (id) order.
    async fn list(&self) -> Result<Vec<Question>, QuestionStoreError>;

    /// Fetch a non-deleted question snapshot with its answers.
    async fn find(&self, id: QuestionId) -> Result<Option<Question>, QuestionStoreError>;

    /// Persist a new question authored by `author`, assigning its id.
    async fn insert(
        &self,
        author: &User,
        title: Title,
        contents: Contents,
    ) -> Result<Question, QuestionStoreError>;

    /// Replace title and contents of a non-deleted question.
    ///
    /// Returns the updated snapshot, or `None` when the question does not
    /// exist (or is deleted).
    async fn update(
        &self,
        id: QuestionId,
        title: Title,
        contents: Contents,
    ) -> Result<Option<Question>, QuestionStoreError>;

    /// Persist a new answer under an existing, non-deleted question.
    ///
    /// Returns `None` when the parent question does not exist; the parent
    /// check and the insert happen under one guard so an answer can never be
    /// attached to a question deleted in between.
    async fn insert_answer(
        &self,
        question_id: QuestionId,
        author: &User,
        contents: AnswerContents,
    ) -> Result<Option<Answer>, QuestionStoreError>;

    /// Fetch a non-deleted answer.
    async fn find_answer(&self, id: AnswerId) -> Result<Option<Answer>, QuestionStoreError>;

    /// Mark a question and all its answers deleted in one atomic transition.
    ///
    /// Returns `false` when the question does not exist (or is deleted).
    async fn delete_question_with_answers(
        &self,
        id: QuestionId,
    ) -> Result<bool, QuestionStoreError>;

    /// Mark a single answer deleted.
    ///
    /// Returns `false` when the answer does not exist (or is deleted).
    async fn delete_answer(&self, id: AnswerId) -> Result<bool, QuestionStoreError>;
}
