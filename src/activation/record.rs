use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::Secret;

/// Read access to the activation fields stored on a user.
pub trait PendingActivation {
    fn email_verification_token(&self) -> Option<&str>;
    fn email_verification_expiration(&self) -> Option<DateTime<Utc>>;
}

/// What gets persisted on the user: the salted hash and its absolute expiration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HashedActivationRecord {
    pub email_verification_token: String,
    pub email_verification_expiration: DateTime<Utc>,
}

impl PendingActivation for HashedActivationRecord {
    fn email_verification_token(&self) -> Option<&str> {
        Some(&self.email_verification_token)
    }

    fn email_verification_expiration(&self) -> Option<DateTime<Utc>> {
        Some(self.email_verification_expiration)
    }
}

/// Output of issuance: the plaintext to deliver out-of-band and the record to persist.
#[derive(Debug)]
pub struct IssuedActivation {
    pub(crate) token: Secret<String>,
    pub(crate) record: HashedActivationRecord,
}

impl IssuedActivation {
    pub fn token(&self) -> &Secret<String> {
        &self.token
    }

    pub fn hashed_token(&self) -> &str {
        &self.record.email_verification_token
    }

    pub fn expiration(&self) -> DateTime<Utc> {
        self.record.email_verification_expiration
    }

    pub fn expiration_rfc3339(&self) -> String {
        self.expiration().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn record(&self) -> &HashedActivationRecord {
        &self.record
    }

    pub fn into_parts(self) -> (Secret<String>, HashedActivationRecord) {
        (self.token, self.record)
    }
}
