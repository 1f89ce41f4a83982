//! Async entry points that tie the manager to a [`UserRepository`].
//!
//! Hashing and verification run on the blocking pool. A successful
//! confirmation clears the stored record so the same token cannot be replayed.

use anyhow::Context;
use secrecy::Secret;

use super::{ActivationTokenManager, VerificationError};
use crate::domain::ActivationEmail;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::users::UserRepository;
use crate::utils::error_chain_fmt;

#[tracing::instrument(
    name = "Issue an activation token",
    skip(repository, manager),
    fields(user_id = tracing::field::Empty)
)]
pub async fn issue_activation<R>(
    repository: &R,
    manager: &ActivationTokenManager,
    email: &ActivationEmail,
) -> Result<Secret<String>, IssueActivationError>
where
    R: UserRepository + ?Sized,
{
    let user = repository
        .find_by_email(email)
        .await
        .context("Failed to look up the user to activate")?
        .ok_or(IssueActivationError::UnknownUser)?;
    tracing::Span::current().record("user_id", &tracing::field::display(&user.user_id));

    let manager = manager.clone();
    let email = email.clone();
    let issued = spawn_blocking_with_tracing(move || manager.create_hashed_record(&email))
        .await
        .context("Failed to spawn blocking task.")??;

    let (token, record) = issued.into_parts();
    repository
        .store_activation(user.user_id, &record)
        .await
        .context("Failed to store the activation record")?;

    Ok(token)
}

#[tracing::instrument(
    name = "Confirm an activation token",
    skip(repository, manager, token),
    fields(user_id = tracing::field::Empty)
)]
pub async fn confirm_activation<R>(
    repository: &R,
    manager: &ActivationTokenManager,
    email: &ActivationEmail,
    token: Secret<String>,
) -> Result<(), ConfirmActivationError>
where
    R: UserRepository + ?Sized,
{
    let user = repository
        .find_by_email(email)
        .await
        .context("Failed to look up the user to activate")?;
    let user_id = user.as_ref().map(|u| u.user_id);
    let stored_hash = user
        .as_ref()
        .and_then(|u| u.email_verification_token.clone());
    if let Some(user_id) = user_id {
        tracing::Span::current().record("user_id", &tracing::field::display(&user_id));
    }

    let manager = manager.clone();
    spawn_blocking_with_tracing(move || manager.verify_token(&token, user.as_ref()))
        .await
        .context("Failed to spawn blocking task.")??;

    let (Some(user_id), Some(verified_hash)) = (user_id, stored_hash) else {
        return Err(ConfirmActivationError::Rejected(
            VerificationError::TokenNotConfigured,
        ));
    };
    let completed = repository
        .complete_activation(user_id, &verified_hash)
        .await
        .context("Failed to mark the user as activated")?;
    if !completed {
        // Consumed or re-issued between verification and completion.
        return Err(ConfirmActivationError::Rejected(
            VerificationError::TokenNotConfigured,
        ));
    }

    Ok(())
}

#[derive(thiserror::Error)]
pub enum IssueActivationError {
    #[error("There is no user registered with this email")]
    UnknownUser,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for IssueActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum ConfirmActivationError {
    #[error("The activation was rejected")]
    Rejected(#[source] VerificationError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<VerificationError> for ConfirmActivationError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::UnexpectedError(e) => ConfirmActivationError::UnexpectedError(e),
            rejection => ConfirmActivationError::Rejected(rejection),
        }
    }
}

impl std::fmt::Debug for ConfirmActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
