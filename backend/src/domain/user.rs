//! Authenticated user profile.
//!
//! The identity provider owns the profile; the service only keeps the fields
//! it renders, for the lifetime of the session cookie.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`AuthenticatedUser::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The provider subject identifier was blank.
    EmptyId,
    /// Neither a display name nor an email address was supplied.
    EmptyDisplayName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Profile record for a user signed in through the identity provider.
///
/// ## Invariants
/// - `id` is the provider's stable subject identifier and is never blank.
/// - `display_name` is never blank; it falls back to the email address when
///   the provider omits a name.
///
/// # Examples
/// ```
/// use yt2mp3::domain::AuthenticatedUser;
///
/// let user = AuthenticatedUser::try_new("1234", "", Some("ada@example.com".into()), None)
///     .expect("valid profile");
/// assert_eq!(user.display_name(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct AuthenticatedUser {
    id: String,
    display_name: String,
    email: Option<String>,
    avatar_url: Option<String>,
}

impl AuthenticatedUser {
    /// Validate and construct a profile.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError`] when the id is blank or no usable
    /// display name can be derived.
    pub fn try_new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let email = email.filter(|value| !value.trim().is_empty());
        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            email.clone().ok_or(UserValidationError::EmptyDisplayName)?
        } else {
            display_name.trim().to_owned()
        };
        Ok(Self {
            id,
            display_name,
            email,
            avatar_url: avatar_url.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Provider subject identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Name shown in the page header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Verified email address, when the provider shared one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Profile picture URL, when the provider shared one.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

impl From<AuthenticatedUser> for UserDto {
    fn from(value: AuthenticatedUser) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name,
            email: value.email,
            avatar_url: value.avatar_url,
        }
    }
}

impl TryFrom<UserDto> for AuthenticatedUser {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Self::try_new(value.id, value.display_name, value.email, value.avatar_url)
    }
}
