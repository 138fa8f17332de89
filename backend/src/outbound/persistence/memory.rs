//! In-memory question storage adapter.
//!
//! Backs tests and the default server wiring. A single `RwLock` over both
//! tables gives the port its atomicity guarantee: every mutation, including
//! the cascading question delete, happens under one write guard, so no
//! reader observes a question deleted while its answers are not.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::answer::{Answer, AnswerContents, AnswerId};
use crate::domain::ports::{QuestionRepository, QuestionStoreError};
use crate::domain::question::{Contents, Question, QuestionId, Title};
use crate::domain::User;

#[derive(Debug, Default)]
struct Tables {
    questions: BTreeMap<i64, Question>,
    answers: BTreeMap<i64, Answer>,
    next_question_id: i64,
    next_answer_id: i64,
}

impl Tables {
    /// Non-deleted answers of a question, in id (insertion) order.
    fn answers_of(&self, question_id: QuestionId) -> Vec<Answer> {
        self.answers
            .values()
            .filter(|answer| answer.question_id() == question_id && !answer.is_deleted())
            .cloned()
            .collect()
    }

    fn snapshot(&self, question: &Question) -> Question {
        question.clone().with_answers(self.answers_of(question.id()))
    }
}

/// [`QuestionRepository`] adapter holding all entities in process memory.
///
/// Ids are assigned sequentially starting at 1. Deleted entities stay in the
/// tables with their flag set; read operations report them as absent.
#[derive(Debug, Default)]
pub struct MemoryQuestionRepository {
    tables: RwLock<Tables>,
}

impl MemoryQuestionRepository {
    /// Build an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for MemoryQuestionRepository {
    async fn list(&self) -> Result<Vec<Question>, QuestionStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|question| !question.is_deleted())
            .map(|question| tables.snapshot(question))
            .collect())
    }

    async fn find(&self, id: QuestionId) -> Result<Option<Question>, QuestionStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .get(&id.value())
            .filter(|question| !question.is_deleted())
            .map(|question| tables.snapshot(question)))
    }

    async fn insert(
        &self,
        author: &User,
        title: Title,
        contents: Contents,
    ) -> Result<Question, QuestionStoreError> {
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let id = QuestionId::new(tables.next_question_id);
        let question = Question::new(id, title, contents, author.clone(), Utc::now());
        tables.questions.insert(id.value(), question.clone());
        Ok(question)
    }

    async fn update(
        &self,
        id: QuestionId,
        title: Title,
        contents: Contents,
    ) -> Result<Option<Question>, QuestionStoreError> {
        let mut tables = self.tables.write().await;
        let Some(question) = tables
            .questions
            .get_mut(&id.value())
            .filter(|question| !question.is_deleted())
        else {
            return Ok(None);
        };
        question.apply_update(title, contents, Utc::now());
        let question = question.clone();
        Ok(Some(tables.snapshot(&question)))
    }

    async fn insert_answer(
        &self,
        question_id: QuestionId,
        author: &User,
        contents: AnswerContents,
    ) -> Result<Option<Answer>, QuestionStoreError> {
        let mut tables = self.tables.write().await;
        let parent_exists = tables
            .questions
            .get(&question_id.value())
            .is_some_and(|question| !question.is_deleted());
        if !parent_exists {
            return Ok(None);
        }

        tables.next_answer_id += 1;
        let id = AnswerId::new(tables.next_answer_id);
        let answer = Answer::new(id, question_id, contents, author.clone(), Utc::now());
        tables.answers.insert(id.value(), answer.clone());
        Ok(Some(answer))
    }

    async fn find_answer(&self, id: AnswerId) -> Result<Option<Answer>, QuestionStoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .get(&id.value())
            .filter(|answer| !answer.is_deleted())
            .cloned())
    }

    async fn delete_question_with_answers(
        &self,
        id: QuestionId,
    ) -> Result<bool, QuestionStoreError> {
        // One write guard spans the whole cascade.
        let mut tables = self.tables.write().await;
        let Some(question) = tables
            .questions
            .get_mut(&id.value())
            .filter(|question| !question.is_deleted())
        else {
            return Ok(false);
        };
        question.mark_deleted();

        for answer in tables
            .answers
            .values_mut()
            .filter(|answer| answer.question_id() == id)
        {
            answer.mark_deleted();
        }
        Ok(true)
    }

    async fn delete_answer(&self, id: AnswerId) -> Result<bool, QuestionStoreError> {
        let mut tables = self.tables.write().await;
        let Some(answer) = tables
            .answers
            .get_mut(&id.value())
            .filter(|answer| !answer.is_deleted())
        else {
            return Ok(false);
        };
        answer.mark_deleted();
        Ok(true)
    }
}
