use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

use super::{HashedActivationRecord, IssuedActivation, PendingActivation};
use super::{SignatureError, VerificationError};
use crate::configuration::{ActivationSettings, ConfigurationError};
use crate::domain::{ActivationEmail, SignedToken};

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies activation tokens.
///
/// Built once from [`ActivationSettings`] and shared; it holds no mutable state.
/// Hashing and verification are CPU-bound: async callers should go through
/// [`crate::telemetry::spawn_blocking_with_tracing`].
#[derive(Clone)]
pub struct ActivationTokenManager {
    signer: HmacSha256,
    hasher: Argon2<'static>,
    validity: chrono::Duration,
}

impl ActivationTokenManager {
    pub fn new(settings: &ActivationSettings) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let signer = HmacSha256::new_from_slice(settings.secret_key.expose_secret().as_bytes())
            .map_err(|_| ConfigurationError::Missing("SECRET_KEY"))?;
        let hashing = &settings.hashing;
        let params = Params::new(
            hashing.memory_kib,
            hashing.iterations,
            hashing.parallelism,
            None,
        )
        .map_err(|_| ConfigurationError::Missing("activation.hashing"))?;

        Ok(Self {
            signer,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            validity: settings.validity(),
        })
    }

    pub fn validity(&self) -> chrono::Duration {
        self.validity
    }

    /// `<hex-id>.<hex-hmac>` over a fresh 128-bit identifier.
    pub fn generate_signed_token(&self) -> SignedToken {
        let id = random_hex_id();
        let signature = hex::encode(self.mac_for(&id).finalize().into_bytes());
        SignedToken::new(id, signature)
    }

    /// Checks a token produced by [`generate_signed_token`](Self::generate_signed_token).
    pub fn verify_signed_token(&self, token: &str) -> Result<SignedToken, SignatureError> {
        let token = SignedToken::parse(token).map_err(SignatureError::Malformed)?;
        let tag =
            hex::decode(token.signature()).map_err(|e| SignatureError::Malformed(e.to_string()))?;
        self.mac_for(token.id())
            .verify_slice(&tag)
            .map_err(|_| SignatureError::Mismatch)?;
        Ok(token)
    }

    pub fn create_hashed_record(
        &self,
        email: &ActivationEmail,
    ) -> Result<IssuedActivation, anyhow::Error> {
        self.create_hashed_record_at(email, Utc::now())
    }

    /// The plaintext embeds `email`, so it cannot verify against a record issued
    /// for a different address.
    #[tracing::instrument(name = "Create hashed activation record", skip(self, email))]
    pub fn create_hashed_record_at(
        &self,
        email: &ActivationEmail,
        now: DateTime<Utc>,
    ) -> Result<IssuedActivation, anyhow::Error> {
        let token = Secret::new(format!("{}{}", random_hex_id(), email.as_ref()));
        let salt = SaltString::generate(&mut rand::thread_rng());
        let email_verification_token = self
            .hasher
            .hash_password(token.expose_secret().as_bytes(), &salt)
            .context("Failed to hash activation token")?
            .to_string();
        let email_verification_expiration = now
            .checked_add_signed(self.validity)
            .context("Activation expiration is out of range")?;

        Ok(IssuedActivation {
            token,
            record: HashedActivationRecord {
                email_verification_token,
                email_verification_expiration,
            },
        })
    }

    pub fn verify_token<U>(
        &self,
        candidate: &Secret<String>,
        user: Option<&U>,
    ) -> Result<(), VerificationError>
    where
        U: PendingActivation + ?Sized,
    {
        self.verify_token_at(candidate, user, Utc::now())
    }

    /// Read-only: a successful check does not consume the stored record.
    #[tracing::instrument(name = "Verify activation token", skip(self, candidate, user))]
    pub fn verify_token_at<U>(
        &self,
        candidate: &Secret<String>,
        user: Option<&U>,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError>
    where
        U: PendingActivation + ?Sized,
    {
        let user = user.ok_or(VerificationError::UserMissing)?;
        let stored_hash = user
            .email_verification_token()
            .filter(|hash| !hash.is_empty())
            .ok_or(VerificationError::TokenNotConfigured)?;
        let expiration = user
            .email_verification_expiration()
            .ok_or(VerificationError::TokenNotConfigured)?;

        if now > expiration {
            return Err(VerificationError::TokenExpired);
        }

        let expected_hash = PasswordHash::new(stored_hash)
            .context("Failed to parse stored activation hash in PHC string format.")?;
        self.hasher
            .verify_password(candidate.expose_secret().as_bytes(), &expected_hash)
            .map_err(|_| VerificationError::TokenInvalid)
    }

    fn mac_for(&self, id: &str) -> HmacSha256 {
        let mut mac = self.signer.clone();
        mac.update(id.as_bytes());
        mac
    }
}

impl std::fmt::Debug for ActivationTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationTokenManager")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

fn random_hex_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
