//! Ownership policy and deletion rules.
//!
//! Pure predicates over snapshot state: no I/O, no side effects. The
//! orchestration layer fetches a snapshot, asks these functions, and only
//! then mutates storage, so a denial can never leave partial state behind.

use std::fmt;

use crate::domain::{Answer, Caller, Question, User};

/// The specific cause of a failed authorization check.
///
/// The inbound adapter maps every reason to HTTP 403; the distinction is kept
/// for response messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The caller is not the author of the resource.
    Ownership,
    /// Deleting the question would remove another user's answer.
    ForeignAnswer,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ownership => write!(f, "caller is not the author of the resource"),
            Self::ForeignAnswer => {
                write!(f, "question has answers authored by other users")
            }
        }
    }
}

/// Whether `caller` may mutate a resource authored by `author`.
///
/// True iff the caller is authenticated and shares the author's id.
/// Anonymous callers always fail; the orchestration layer decides whether
/// that surfaces as forbidden or authentication-required.
///
/// # Examples
/// ```
/// use qna_backend::domain::policy::can_modify;
/// use qna_backend::domain::{Caller, User};
///
/// let author = User::from_parts(1, "javajigi", "Javajigi");
/// assert!(can_modify(&Caller::Authenticated(author.clone()), &author));
/// assert!(!can_modify(&Caller::Anonymous, &author));
/// ```
pub fn can_modify(caller: &Caller, author: &User) -> bool {
    caller
        .authenticated()
        .is_some_and(|user| user.id() == author.id())
}

/// Decide whether `caller` may delete `question` as a whole.
///
/// The check is all-or-nothing over the full ordered set of non-deleted
/// answers in the snapshot: the caller must own the question, and every
/// answer (zero answers included) must be the caller's own. A single answer
/// by another user denies the whole deletion; there is no partial delete and
/// no role-based override.
pub fn check_delete_question(caller: &Caller, question: &Question) -> Result<(), DenialReason> {
    let Some(user) = caller.authenticated() else {
        return Err(DenialReason::Ownership);
    };
    if user.id() != question.author().id() {
        return Err(DenialReason::Ownership);
    }

    let all_own = question
        .answers()
        .iter()
        .filter(|answer| !answer.is_deleted())
        .all(|answer| answer.author().id() == user.id());
    if all_own {
        Ok(())
    } else {
        Err(DenialReason::ForeignAnswer)
    }
}

/// Decide whether `caller` may delete `answer`.
///
/// Permitted iff the caller owns the answer. Deleting an answer never
/// affects sibling answers or the parent question retroactively; each
/// deletion call re-evaluates current state.
pub fn check_delete_answer(caller: &Caller, answer: &Answer) -> Result<(), DenialReason> {
    if can_modify(caller, answer.author()) {
        Ok(())
    } else {
        Err(DenialReason::Ownership)
    }
}
