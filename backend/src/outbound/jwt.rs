//! JWT verification for identity-provider id tokens.
//!
//! Tokens are checked for signature, expiry, and (when configured) issuer
//! and audience. Tokens that carry a `token_use` claim must be id tokens.
//! The username is the `cognito:username` claim, falling back to `sub`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::domain::Username;
use crate::domain::ports::{TokenVerificationError, TokenVerifier, VerifiedIdentity};

#[derive(Debug, Deserialize)]
struct IdClaims {
    sub: Option<String>,
    #[serde(rename = "cognito:username")]
    cognito_username: Option<String>,
    token_use: Option<String>,
}

/// Signing key material accepted by [`JwtTokenVerifier`].
pub enum VerificationKey<'a> {
    /// RSA public key in PEM form (RS256).
    RsaPem(&'a [u8]),
    /// Shared HMAC secret (HS256).
    Secret(&'a [u8]),
}

/// [`TokenVerifier`] backed by `jsonwebtoken`.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Build a verifier.
    ///
    /// # Errors
    ///
    /// Returns [`TokenVerificationError::Invalid`] when the PEM cannot be
    /// parsed.
    pub fn new(
        key: VerificationKey<'_>,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, TokenVerificationError> {
        let (key, algorithm) = match key {
            VerificationKey::RsaPem(pem) => (
                DecodingKey::from_rsa_pem(pem)
                    .map_err(|err| TokenVerificationError::invalid(format!("public key: {err}")))?,
                Algorithm::RS256,
            ),
            VerificationKey::Secret(secret) => (DecodingKey::from_secret(secret), Algorithm::HS256),
        };
        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Ok(Self { key, validation })
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenVerificationError> {
        let claims = decode::<IdClaims>(token, &self.key, &self.validation)
            .map_err(|err| TokenVerificationError::invalid(err.to_string()))?
            .claims;
        match claims.token_use {
            Some(token_use) if token_use != "id" => {
                return Err(TokenVerificationError::wrong_token_use(token_use));
            }
            _ => {}
        }
        let raw = claims
            .cognito_username
            .or(claims.sub)
            .ok_or_else(TokenVerificationError::missing_username)?;
        let username =
            Username::new(raw).map_err(|_| TokenVerificationError::missing_username())?;
        Ok(VerifiedIdentity { username })
    }
}
