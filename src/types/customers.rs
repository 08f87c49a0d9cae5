//! Customer request types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

/// Body of `POST /api/customer/login`.
///
/// The password stays wrapped until serialization and is redacted from
/// `Debug` output.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl LoginRequest {
    /// Creates a login request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
