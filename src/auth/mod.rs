//! Authentication for registry requests
//!
//! Only anonymous access is supported. Registries that insist on a token
//! (ghcr) hand out anonymous pull tokens from an OAuth-style endpoint, which
//! are then sent as bearer credentials.

use serde::Deserialize;


/// Credentials attached to a single registry request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegistryAuth {
    #[default]
    Anonymous,
    Bearer(String),
}

impl RegistryAuth {
    /// Check if this is anonymous authentication
    pub fn is_anonymous(&self) -> bool {
        matches!(self, RegistryAuth::Anonymous)
    }

    /// Convert to authorization header value
    pub fn to_authorization_header(&self) -> Option<String> {
        match self {
            RegistryAuth::Anonymous => None,
            RegistryAuth::Bearer(token) => Some(format!("Bearer {}", token)),
        }
    }
}

/// Body returned by a registry token endpoint
///
/// Docker's token spec allows either `token` or `access_token`; ghcr sends the
/// former, some other registries only the latter.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTokenResponse")]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize)]
struct RawTokenResponse {
    token: Option<String>,
    access_token: Option<String>,
}

impl TryFrom<RawTokenResponse> for TokenResponse {
    type Error = String;

    fn try_from(raw: RawTokenResponse) -> Result<Self, Self::Error> {
        raw.token
            .or(raw.access_token)
            .map(|token| TokenResponse { token })
            .ok_or_else(|| "token response has neither `token` nor `access_token`".to_string())
    }
}

impl TokenResponse {
    pub fn into_auth(self) -> RegistryAuth {
        RegistryAuth::Bearer(self.token)
    }
}
