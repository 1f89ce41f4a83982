//! Email-activation tokens: issuance of hashed records, their verification,
//! and HMAC-signed opaque tokens.

mod error;
mod manager;
mod record;
pub mod service;

pub use error::{SignatureError, VerificationError};
pub use manager::ActivationTokenManager;
pub use record::{HashedActivationRecord, IssuedActivation, PendingActivation};
pub use service::{confirm_activation, issue_activation, ConfirmActivationError, IssueActivationError};
