//! Answer data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::question::QuestionId;
use crate::domain::{User, UserValidationError};

/// Validation errors returned by the answer constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValidationError {
    /// Contents were missing or blank once trimmed.
    EmptyContents,
    /// The embedded author failed user validation.
    InvalidAuthor(UserValidationError),
}

impl fmt::Display for AnswerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContents => write!(f, "answer contents must not be empty"),
            Self::InvalidAuthor(err) => write!(f, "answer author is invalid: {err}"),
        }
    }
}

impl std::error::Error for AnswerValidationError {}

impl From<UserValidationError> for AnswerValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidAuthor(value)
    }
}

/// Stable numeric answer identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct AnswerId(i64);

impl AnswerId {
    /// Wrap a raw storage identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw storage identifier.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AnswerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Body text of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnswerContents(String);

impl AnswerContents {
    /// Validate and construct [`AnswerContents`] from owned input.
    pub fn new(contents: impl Into<String>) -> Result<Self, AnswerValidationError> {
        Self::from_owned(contents.into())
    }

    fn from_owned(contents: String) -> Result<Self, AnswerValidationError> {
        if contents.trim().is_empty() {
            return Err(AnswerValidationError::EmptyContents);
        }
        Ok(Self(contents))
    }
}

impl AsRef<str> for AnswerContents {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AnswerContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AnswerContents> for String {
    fn from(value: AnswerContents) -> Self {
        value.0
    }
}

impl TryFrom<String> for AnswerContents {
    type Error = AnswerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Reply attached to exactly one question.
///
/// ## Invariants
/// - `question_id` references the parent question the answer was created
///   under; an answer never moves between questions.
/// - `contents` is non-empty once trimmed.
/// - A deleted answer stays in storage with `deleted == true` and is excluded
///   from question snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "AnswerDto", into = "AnswerDto")]
pub struct Answer {
    #[schema(value_type = i64, example = 7)]
    id: AnswerId,
    #[schema(value_type = i64, example = 1)]
    question_id: QuestionId,
    #[schema(value_type = String, example = "Have you tried turning it off and on again?")]
    contents: AnswerContents,
    author: User,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl Answer {
    /// Build a new, non-deleted [`Answer`] from validated components.
    pub const fn new(
        id: AnswerId,
        question_id: QuestionId,
        contents: AnswerContents,
        author: User,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            question_id,
            contents,
            author,
            deleted: false,
            created_at,
        }
    }

    /// Stable answer identifier.
    pub const fn id(&self) -> AnswerId {
        self.id
    }

    /// Identifier of the parent question.
    pub const fn question_id(&self) -> QuestionId {
        self.question_id
    }

    /// Body text.
    pub const fn contents(&self) -> &AnswerContents {
        &self.contents
    }

    /// The user who wrote the answer.
    pub const fn author(&self) -> &User {
        &self.author
    }

    /// Whether the answer has been soft deleted.
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Creation timestamp (UTC).
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Mark the answer soft deleted. Deletion is never reversed.
    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct AnswerDto {
    id: AnswerId,
    question_id: QuestionId,
    contents: String,
    author: User,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl From<Answer> for AnswerDto {
    fn from(value: Answer) -> Self {
        let Answer {
            id,
            question_id,
            contents,
            author,
            deleted,
            created_at,
        } = value;
        Self {
            id,
            question_id,
            contents: contents.into(),
            author,
            deleted,
            created_at,
        }
    }
}

impl TryFrom<AnswerDto> for Answer {
    type Error = AnswerValidationError;

    fn try_from(value: AnswerDto) -> Result<Self, Self::Error> {
        let AnswerDto {
            id,
            question_id,
            contents,
            author,
            deleted,
            created_at,
        } = value;

        let mut answer = Answer::new(
            id,
            question_id,
            AnswerContents::new(contents)?,
            author,
            created_at,
        );
        if deleted {
            answer.mark_deleted();
        }
        Ok(answer)
    }
}
