//! Port for verifying identity tokens issued by the external provider.

use crate::domain::Username;

use super::define_port_error;

define_port_error! {
    /// Reasons a presented token is rejected.
    pub enum TokenVerificationError {
        /// Signature, expiry, issuer, or audience checks failed.
        Invalid { message: String } => "identity token rejected: {message}",
        /// The token is not an id token.
        WrongTokenUse { found: String } => "expected an id token, found {found}",
        /// No usable username claim was present.
        MissingUsername => "identity token carries no username",
    }
}

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub username: Username,
}

/// Verifies bearer tokens and yields the external identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenVerificationError>;
}
