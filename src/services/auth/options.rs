use std::fmt;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::error::AuthErrorKind;

/// Construction-time failures. A gate that hits one of these is never built.
#[derive(Debug, Error)]
pub enum GateConfigError {
    #[error("JWT auth middleware requires options for \"secret\"")]
    MissingSecret,

    #[error("JWT auth middleware requires at least one allowed algorithm")]
    NoAlgorithms,

    #[error("algorithms {0:?} and {1:?} cannot be verified with the same key")]
    MixedKeyFamilies(Algorithm, Algorithm),

    #[error("secret is not a valid {algorithm:?} verification key: {source}")]
    InvalidKey {
        algorithm: Algorithm,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// Settings for [`JwtAuth`](super::JwtAuth).
///
/// `secret` is the HMAC shared secret for `HS*` algorithms, or a PEM encoded
/// public key for the RSA, EC and EdDSA families.
#[derive(Clone)]
pub struct AuthOptions {
    pub secret: String,
    pub algorithms: Vec<Algorithm>,
    pub invalid_authentication_header_message: Option<String>,
    pub no_authentication_header_message: Option<String>,
    pub token_expire_message: Option<String>,
    pub token_failure_verification_message: Option<String>,
    /// Clock tolerance applied to `exp` and `nbf`.
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthOptions")
            .field("algorithms", &self.algorithms)
            .field(
                "invalid_authentication_header_message",
                &self.invalid_authentication_header_message,
            )
            .field(
                "no_authentication_header_message",
                &self.no_authentication_header_message,
            )
            .field("token_expire_message", &self.token_expire_message)
            .field(
                "token_failure_verification_message",
                &self.token_failure_verification_message,
            )
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl AuthOptions {
    /// Duplicate algorithms are dropped, keeping the first occurrence.
    pub fn new(secret: impl Into<String>, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        let mut allowed = Vec::new();
        for alg in algorithms {
            if !allowed.contains(&alg) {
                allowed.push(alg);
            }
        }

        Self {
            secret: secret.into(),
            algorithms: allowed,
            invalid_authentication_header_message: None,
            no_authentication_header_message: None,
            token_expire_message: None,
            token_failure_verification_message: None,
            leeway_seconds: 0,
        }
    }

    pub fn with_invalid_authentication_header_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_authentication_header_message = Some(message.into());
        self
    }

    pub fn with_no_authentication_header_message(mut self, message: impl Into<String>) -> Self {
        self.no_authentication_header_message = Some(message.into());
        self
    }

    pub fn with_token_expire_message(mut self, message: impl Into<String>) -> Self {
        self.token_expire_message = Some(message.into());
        self
    }

    pub fn with_token_failure_verification_message(mut self, message: impl Into<String>) -> Self {
        self.token_failure_verification_message = Some(message.into());
        self
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    /// Checks the invariants every gate relies on, whatever verifier it uses.
    pub fn validate(&self) -> Result<(), GateConfigError> {
        if self.secret.trim().is_empty() {
            return Err(GateConfigError::MissingSecret);
        }
        if self.algorithms.is_empty() {
            return Err(GateConfigError::NoAlgorithms);
        }
        Ok(())
    }

    /// The configured override for `kind`, or its default message.
    pub fn message_for(&self, kind: AuthErrorKind) -> &str {
        let configured = match kind {
            AuthErrorKind::NoAuthHeader => &self.no_authentication_header_message,
            AuthErrorKind::InvalidAuthHeader => &self.invalid_authentication_header_message,
            AuthErrorKind::TokenExpired => &self.token_expire_message,
            AuthErrorKind::TokenInvalid => &self.token_failure_verification_message,
        };

        configured
            .as_deref()
            .unwrap_or_else(|| kind.default_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithms_deduplicated_in_order() {
        let options = AuthOptions::new(
            "secret",
            [Algorithm::HS512, Algorithm::HS256, Algorithm::HS512],
        );
        assert_eq!(options.algorithms, vec![Algorithm::HS512, Algorithm::HS256]);
    }

    #[test]
    fn test_validate_rejects_empty_and_blank_secret() {
        for secret in ["", "   "] {
            let err = AuthOptions::new(secret, [Algorithm::HS256])
                .validate()
                .unwrap_err();
            assert!(matches!(err, GateConfigError::MissingSecret));
        }
    }

    #[test]
    fn test_validate_rejects_empty_algorithms() {
        let err = AuthOptions::new("secret", []).validate().unwrap_err();
        assert!(matches!(err, GateConfigError::NoAlgorithms));
    }

    #[test]
    fn test_message_for_prefers_override() {
        let options = AuthOptions::new("secret", [Algorithm::HS256])
            .with_token_expire_message("session over");

        assert_eq!(options.message_for(AuthErrorKind::TokenExpired), "session over");
        assert_eq!(
            options.message_for(AuthErrorKind::TokenInvalid),
            "token verification failure"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let options = AuthOptions::new("super-secret-value", [Algorithm::HS256]);
        assert!(!format!("{options:?}").contains("super-secret-value"));
    }
}
