//! Driving port for credential resolution.
//!
//! Inbound adapters call this to turn session ids or `Authorization: Basic`
//! credentials into a [`User`] without knowing the backing account store.
//! HTTP handler tests stay deterministic by substituting the fixture.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, User, UserId};

/// Errors raised by identity provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Account backend could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable {
        /// Adapter-specific failure description.
        message: String,
    },
}

/// Domain port resolving caller identity from credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate credentials, returning the matching user or `None`.
    ///
    /// `None` means the credentials did not resolve; deciding whether that is
    /// an error is the caller's concern.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, IdentityError>;

    /// Resolve a previously established identity (e.g. from a session).
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, IdentityError>;
}

/// In-memory identity provider used by tests and default server wiring.
///
/// Seeds the two well-known accounts: `javajigi`/`test` and
/// `sanjigi`/`test2`.
#[derive(Debug, Clone)]
pub struct FixtureIdentityProvider {
    accounts: Vec<(User, String)>,
}

impl FixtureIdentityProvider {
    /// Build a provider with explicit accounts.
    pub const fn with_accounts(accounts: Vec<(User, String)>) -> Self {
        Self { accounts }
    }
}

impl Default for FixtureIdentityProvider {
    fn default() -> Self {
        Self::with_accounts(vec![
            (
                User::from_parts(1, "javajigi", "Javajigi"),
                "test".to_owned(),
            ),
            (
                User::from_parts(2, "sanjigi", "Sanjigi"),
                "test2".to_owned(),
            ),
        ])
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, IdentityError> {
        let user = self
            .accounts
            .iter()
            .find(|(user, password)| {
                user.login_id().as_ref() == credentials.login_id()
                    && password == credentials.password()
            })
            .map(|(user, _)| user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, IdentityError> {
        let user = self
            .accounts
            .iter()
            .find(|(user, _)| user.id() == id)
            .map(|(user, _)| user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("javajigi", "test", true)]
    #[case("sanjigi", "test2", true)]
    #[case("javajigi", "wrong", false)]
    #[case("nobody", "test", false)]
    #[tokio::test]
    async fn fixture_resolves_seeded_accounts(
        #[case] login_id: &str,
        #[case] password: &str,
        #[case] should_resolve: bool,
    ) {
        let provider = FixtureIdentityProvider::default();
        let creds =
            LoginCredentials::try_from_parts(login_id, password).expect("credentials shape");
        let resolved = provider.authenticate(&creds).await.expect("no backend");
        assert_eq!(resolved.is_some(), should_resolve);
        if let Some(user) = resolved {
            assert_eq!(user.login_id().as_ref(), login_id);
        }
    }

    #[tokio::test]
    async fn fixture_resolves_ids_from_sessions() {
        let provider = FixtureIdentityProvider::default();
        let user = provider
            .find_by_id(UserId::new(2))
            .await
            .expect("no backend")
            .expect("seeded user");
        assert_eq!(user.login_id().as_ref(), "sanjigi");

        let missing = provider
            .find_by_id(UserId::new(99))
            .await
            .expect("no backend");
        assert!(missing.is_none());
    }
}
