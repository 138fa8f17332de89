//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Login id was missing or blank once trimmed.
    EmptyLoginId,
    /// Login id fell below the minimum length.
    LoginIdTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Login id exceeded the maximum length.
    LoginIdTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Login id contained characters outside the allowed set.
    LoginIdInvalidCharacters,
    /// Display name was missing or blank once trimmed.
    EmptyName,
    /// Display name exceeded the maximum length.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLoginId => write!(f, "login id must not be empty"),
            Self::LoginIdTooShort { min } => {
                write!(f, "login id must be at least {min} characters")
            }
            Self::LoginIdTooLong { max } => {
                write!(f, "login id must be at most {max} characters")
            }
            Self::LoginIdInvalidCharacters => write!(
                f,
                "login id may only contain letters, numbers, or underscores",
            ),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable numeric user identifier.
///
/// Ownership checks compare these ids; two `User` values denote the same
/// account iff their ids are equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw storage identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw storage identifier.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Minimum allowed length for a login id.
pub const LOGIN_ID_MIN: usize = 3;
/// Maximum allowed length for a login id.
pub const LOGIN_ID_MAX: usize = 20;
/// Maximum allowed length for a display name.
pub const USER_NAME_MAX: usize = 20;

static LOGIN_ID_RE: OnceLock<Regex> = OnceLock::new();

fn login_id_regex() -> &'static Regex {
    LOGIN_ID_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("login id regex failed to compile: {error}"))
    })
}

/// Unique login handle used to sign in and attribute authorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginId(String);

impl LoginId {
    /// Validate and construct a [`LoginId`] from owned input.
    pub fn new(login_id: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(login_id.into())
    }

    fn from_owned(login_id: String) -> Result<Self, UserValidationError> {
        if login_id.trim().is_empty() {
            return Err(UserValidationError::EmptyLoginId);
        }

        let length = login_id.chars().count();
        if length < LOGIN_ID_MIN {
            return Err(UserValidationError::LoginIdTooShort { min: LOGIN_ID_MIN });
        }
        if length > LOGIN_ID_MAX {
            return Err(UserValidationError::LoginIdTooLong { max: LOGIN_ID_MAX });
        }

        if !login_id_regex().is_match(&login_id) {
            return Err(UserValidationError::LoginIdInvalidCharacters);
        }

        Ok(Self(login_id))
    }
}

impl AsRef<str> for LoginId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoginId> for String {
    fn from(value: LoginId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoginId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Application user.
///
/// ## Invariants
/// - `login_id` is a non-empty `[A-Za-z0-9_]+` token within length bounds.
/// - `name` is non-empty once trimmed of whitespace.
///
/// Identity comparison is by `id` only; see
/// [`policy::can_modify`](crate::domain::policy::can_modify).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = i64, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "javajigi")]
    login_id: LoginId,
    #[schema(value_type = String, example = "Javajigi")]
    name: UserName,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub const fn new(id: UserId, login_id: LoginId, name: UserName) -> Self {
        Self { id, login_id, name }
    }

    /// Build a new [`User`] from raw inputs, panicking if validation fails.
    ///
    /// Prefer [`User::new`] when components are already validated.
    pub fn from_parts(id: i64, login_id: impl Into<String>, name: impl Into<String>) -> Self {
        match Self::try_from_parts(id, login_id, name) {
            Ok(value) => value,
            Err(err) => panic!("user values must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor enforcing login id and name invariants.
    pub fn try_from_parts(
        id: i64,
        login_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let login_id = LoginId::new(login_id)?;
        let name = UserName::new(name)?;

        Ok(Self::new(UserId::new(id), login_id, name))
    }

    /// Stable user identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Unique login handle.
    pub const fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    /// Display name shown alongside authored content.
    pub const fn name(&self) -> &UserName {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: i64,
    login_id: String,
    name: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, login_id, name } = value;
        Self {
            id: id.value(),
            login_id: login_id.into(),
            name: name.into(),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_from_parts(value.id, value.login_id, value.name)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyLoginId)]
    #[case("  ", UserValidationError::EmptyLoginId)]
    #[case("ab", UserValidationError::LoginIdTooShort { min: LOGIN_ID_MIN })]
    #[case(
        "a_very_long_login_id_indeed",
        UserValidationError::LoginIdTooLong { max: LOGIN_ID_MAX }
    )]
    #[case("java jigi", UserValidationError::LoginIdInvalidCharacters)]
    #[case("java-jigi", UserValidationError::LoginIdInvalidCharacters)]
    fn invalid_login_ids(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = LoginId::new(input).expect_err("invalid login id must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("javajigi")]
    #[case("sanjigi")]
    #[case("user_42")]
    fn valid_login_ids(#[case] input: &str) {
        let login_id = LoginId::new(input).expect("valid login id");
        assert_eq!(login_id.as_ref(), input);
    }

    #[test]
    fn users_serialize_camel_case() {
        let user = User::from_parts(1, "javajigi", "Javajigi");
        let value = serde_json::to_value(&user).expect("serializable user");
        assert_eq!(
            value.get("loginId").and_then(serde_json::Value::as_str),
            Some("javajigi")
        );
        assert!(value.get("login_id").is_none());
    }

    #[test]
    fn users_round_trip_through_json() {
        let user = User::from_parts(2, "sanjigi", "Sanjigi");
        let encoded = serde_json::to_string(&user).expect("encode");
        let decoded: User = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, user);
    }
}
