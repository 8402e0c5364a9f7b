//! DTO for Google's userinfo endpoint.

use serde::Deserialize;

use crate::domain::{AuthenticatedUser, UserValidationError};

/// OpenID Connect userinfo claims requested with the `profile email` scopes.
#[derive(Debug, Deserialize)]
pub(super) struct UserInfoDto {
    pub(super) sub: String,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) picture: Option<String>,
}

impl UserInfoDto {
    pub(super) fn into_domain_user(self) -> Result<AuthenticatedUser, UserValidationError> {
        AuthenticatedUser::try_new(
            self.sub,
            self.name.unwrap_or_default(),
            self.email,
            self.picture,
        )
    }
}
