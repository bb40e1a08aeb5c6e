//! Library credentials used to create and renew sessions.

use serde::{Deserialize, Serialize};

/// Username/password pair for the library instance.
///
/// Used only to create or renew a [`crate::domain::Session`]; never attached
/// to regular requests. The password is masked in `Debug` output and must
/// never be logged.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"XXXXXX")
            .finish()
    }
}
