//! Question/answer use-cases orchestrating identity, policy, and storage.
//!
//! Every mutating operation decides its outcome on a snapshot *before*
//! touching storage: a denied call observes state, never changes it. The
//! storage port is trusted to make each mutation (including the cascading
//! question delete) a single atomic transition.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::answer::{Answer, AnswerContents, AnswerId};
use crate::domain::policy::{self, DenialReason};
use crate::domain::ports::{QuestionRepository, QuestionStoreError};
use crate::domain::question::{Contents, Question, QuestionId, Title};
use crate::domain::{Caller, Error, User};

/// Core service sequencing Ownership Policy → Deletion Rule Engine → storage.
#[derive(Clone)]
pub struct ForumService {
    store: Arc<dyn QuestionRepository>,
}

impl ForumService {
    /// Build the service over a storage port.
    pub fn new(store: Arc<dyn QuestionRepository>) -> Self {
        Self { store }
    }

    /// All non-deleted questions in stable insertion order.
    pub async fn list_questions(&self) -> Result<Vec<Question>, Error> {
        self.store.list().await.map_err(store_error)
    }

    /// A single non-deleted question with its answers.
    pub async fn question(&self, id: QuestionId) -> Result<Question, Error> {
        self.store
            .find(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| question_not_found(id))
    }

    /// Create a question authored by the caller.
    pub async fn create_question(
        &self,
        caller: &Caller,
        title: Title,
        contents: Contents,
    ) -> Result<Question, Error> {
        let author = require_user(caller)?;
        let question = self
            .store
            .insert(author, title, contents)
            .await
            .map_err(store_error)?;
        info!(question_id = %question.id(), author = %author.login_id(), "question created");
        Ok(question)
    }

    /// Replace the title and contents of a question the caller owns.
    pub async fn update_question(
        &self,
        caller: &Caller,
        id: QuestionId,
        title: Title,
        contents: Contents,
    ) -> Result<Question, Error> {
        let question = self.question(id).await?;
        if !policy::can_modify(caller, question.author()) {
            return Err(modification_denied(caller, "update", "question"));
        }

        // The snapshot decided the outcome; a question vanishing between the
        // read and the write degrades to not-found rather than a phantom
        // update.
        let updated = self
            .store
            .update(id, title, contents)
            .await
            .map_err(store_error)?
            .ok_or_else(|| question_not_found(id))?;
        info!(question_id = %id, "question updated");
        Ok(updated)
    }

    /// Delete a question and cascade the mark to all its answers.
    pub async fn delete_question(&self, caller: &Caller, id: QuestionId) -> Result<(), Error> {
        let question = self.question(id).await?;
        if let Err(reason) = policy::check_delete_question(caller, &question) {
            debug!(question_id = %id, %reason, "question delete denied");
            return Err(match reason {
                DenialReason::Ownership => modification_denied(caller, "delete", "question"),
                DenialReason::ForeignAnswer => {
                    Error::forbidden("cannot delete a question answered by other users")
                }
            });
        }

        let deleted = self
            .store
            .delete_question_with_answers(id)
            .await
            .map_err(store_error)?;
        if !deleted {
            return Err(question_not_found(id));
        }
        info!(question_id = %id, "question deleted with its answers");
        Ok(())
    }

    /// Attach an answer to an existing, non-deleted question.
    pub async fn create_answer(
        &self,
        caller: &Caller,
        question_id: QuestionId,
        contents: AnswerContents,
    ) -> Result<Answer, Error> {
        let author = require_user(caller)?;
        let answer = self
            .store
            .insert_answer(question_id, author, contents)
            .await
            .map_err(store_error)?
            .ok_or_else(|| question_not_found(question_id))?;
        info!(answer_id = %answer.id(), question_id = %question_id, "answer created");
        Ok(answer)
    }

    /// Delete a single answer the caller owns.
    pub async fn delete_answer(&self, caller: &Caller, id: AnswerId) -> Result<(), Error> {
        let answer = self
            .store
            .find_answer(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found(format!("answer {id} does not exist")))?;
        if policy::check_delete_answer(caller, &answer).is_err() {
            debug!(answer_id = %id, "answer delete denied");
            return Err(modification_denied(caller, "delete", "answer"));
        }

        let deleted = self.store.delete_answer(id).await.map_err(store_error)?;
        if !deleted {
            return Err(Error::not_found(format!("answer {id} does not exist")));
        }
        info!(answer_id = %id, "answer deleted");
        Ok(())
    }
}

fn require_user(caller: &Caller) -> Result<&User, Error> {
    caller
        .authenticated()
        .ok_or_else(|| Error::auth_required("login required"))
}

fn question_not_found(id: QuestionId) -> Error {
    Error::not_found(format!("question {id} does not exist"))
}

/// An anonymous caller failing an ownership gate is asked to authenticate;
/// an authenticated one is told the resource is not theirs. Both are 403.
fn modification_denied(caller: &Caller, verb: &str, noun: &str) -> Error {
    if caller.is_anonymous() {
        Error::auth_required("login required")
    } else {
        Error::forbidden(format!("only the author may {verb} this {noun}"))
    }
}

fn store_error(err: QuestionStoreError) -> Error {
    warn!(error = %err, "question store failure");
    Error::internal("question store failure")
}

#[cfg(test)]
#[path = "forum_service_tests.rs"]
mod tests;
