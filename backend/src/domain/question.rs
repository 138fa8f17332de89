//! Question data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::answer::{Answer, AnswerValidationError};
use crate::domain::{User, UserValidationError};

/// Validation errors returned by the question constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Title exceeded the maximum length.
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Contents were missing or blank once trimmed.
    EmptyContents,
    /// The embedded author failed user validation.
    InvalidAuthor(UserValidationError),
    /// An embedded answer failed answer validation.
    InvalidAnswer(AnswerValidationError),
}

impl fmt::Display for QuestionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContents => write!(f, "contents must not be empty"),
            Self::InvalidAuthor(err) => write!(f, "question author is invalid: {err}"),
            Self::InvalidAnswer(err) => write!(f, "question answer is invalid: {err}"),
        }
    }
}

impl std::error::Error for QuestionValidationError {}

impl From<UserValidationError> for QuestionValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::InvalidAuthor(value)
    }
}

impl From<AnswerValidationError> for QuestionValidationError {
    fn from(value: AnswerValidationError) -> Self {
        Self::InvalidAnswer(value)
    }
}

/// Stable numeric question identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// Wrap a raw storage identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw storage identifier.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Maximum allowed length for a question title.
pub const TITLE_MAX: usize = 100;

/// Validated question title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`] from owned input.
    pub fn new(title: impl Into<String>) -> Result<Self, QuestionValidationError> {
        Self::from_owned(title.into())
    }

    fn from_owned(title: String) -> Result<Self, QuestionValidationError> {
        if title.trim().is_empty() {
            return Err(QuestionValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(QuestionValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = QuestionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated question body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Contents(String);

impl Contents {
    /// Validate and construct [`Contents`] from owned input.
    pub fn new(contents: impl Into<String>) -> Result<Self, QuestionValidationError> {
        Self::from_owned(contents.into())
    }

    fn from_owned(contents: String) -> Result<Self, QuestionValidationError> {
        if contents.trim().is_empty() {
            return Err(QuestionValidationError::EmptyContents);
        }
        Ok(Self(contents))
    }
}

impl AsRef<str> for Contents {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Contents> for String {
    fn from(value: Contents) -> Self {
        value.0
    }
}

impl TryFrom<String> for Contents {
    type Error = QuestionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Top-level forum post.
///
/// ## Invariants
/// - `title` and `contents` are non-empty once trimmed; titles are bounded.
/// - `answers` holds the non-deleted answers of a snapshot in insertion (id)
///   order; deleted answers never appear here.
/// - A deleted question stays in storage with `deleted == true` and is
///   excluded from listings and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "QuestionDto", into = "QuestionDto")]
pub struct Question {
    #[schema(value_type = i64, example = 1)]
    id: QuestionId,
    #[schema(value_type = String, example = "How do I borrow twice?")]
    title: Title,
    #[schema(value_type = String, example = "The borrow checker disagrees with me.")]
    contents: Contents,
    author: User,
    answers: Vec<Answer>,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Question {
    /// Build a new, non-deleted [`Question`] without answers.
    pub const fn new(
        id: QuestionId,
        title: Title,
        contents: Contents,
        author: User,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            contents,
            author,
            answers: Vec::new(),
            deleted: false,
            created_at,
            updated_at: created_at,
        }
    }

    /// Stable question identifier.
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    /// Question title.
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Question body.
    pub const fn contents(&self) -> &Contents {
        &self.contents
    }

    /// The user who asked the question.
    pub const fn author(&self) -> &User {
        &self.author
    }

    /// Non-deleted answers of this snapshot, in insertion order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Whether the question has been soft deleted.
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Creation timestamp (UTC).
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp (UTC).
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace title and contents, stamping the mutation time.
    pub(crate) fn apply_update(&mut self, title: Title, contents: Contents, at: DateTime<Utc>) {
        self.title = title;
        self.contents = contents;
        self.updated_at = at;
    }

    /// Attach the snapshot's answers. Storage adapters call this after
    /// filtering deleted answers and ordering by id.
    pub(crate) fn with_answers(mut self, answers: Vec<Answer>) -> Self {
        self.answers = answers;
        self
    }

    /// Mark the question soft deleted. Deletion is never reversed.
    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: QuestionId,
    title: String,
    contents: String,
    author: User,
    answers: Vec<Answer>,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionDto {
    fn from(value: Question) -> Self {
        let Question {
            id,
            title,
            contents,
            author,
            answers,
            deleted,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            title: title.into(),
            contents: contents.into(),
            author,
            answers,
            deleted,
            created_at,
            updated_at,
        }
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = QuestionValidationError;

    fn try_from(value: QuestionDto) -> Result<Self, Self::Error> {
        let QuestionDto {
            id,
            title,
            contents,
            author,
            answers,
            deleted,
            created_at,
            updated_at,
        } = value;

        let mut question = Question::new(
            id,
            Title::new(title)?,
            Contents::new(contents)?,
            author,
            created_at,
        )
        .with_answers(answers);
        question.updated_at = updated_at;
        if deleted {
            question.mark_deleted();
        }
        Ok(question)
    }
}
