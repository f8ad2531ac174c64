use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Login details for one ourclublogin.com account, fixed for the lifetime of the sensor.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    club_id: String,
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        club_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        Ok(Self {
            club_id: required(club_id.into(), "club id")?,
            username: required(username.into(), "username")?,
            password: required(password.into(), "password")?,
        })
    }

    pub fn club_id(&self) -> &str {
        &self.club_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("club_id", &self.club_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// Values are kept verbatim; only an all-blank value is rejected.
fn required(value: String, field: &'static str) -> Result<String, CredentialsError> {
    if value.trim().is_empty() {
        return Err(CredentialsError::Missing(field));
    }
    Ok(value)
}
