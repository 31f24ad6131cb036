// ============================
// crates/auth-lib/src/auth/authenticator.rs
// ============================
//! Credential authentication against an identity store.
//!
//! Drives one attempt end-to-end as a pipeline of small steps: check the
//! inputs, look the identity up, validate the result set, verify the
//! credential, assemble a sanitized result. Expected failures (unknown
//! identity, ambiguous identity, wrong credential) are [`AuthResult`]
//! values, not errors; only caller or environment faults are.
use credauth_common::{AuthOutcome, AuthResult, IdentityRecord};
use metrics::counter;
use tracing::{debug, warn};

use super::password::verify_password;
use crate::config::Settings;
use crate::error::AuthError;
use crate::store::{FlatFileIdentityStore, IdentityStore};

/// Default column holding the stored credential hash
pub const DEFAULT_CREDENTIAL_COLUMN: &str = "password";

/// Default legacy salt column, stripped from returned records
pub const DEFAULT_SALT_COLUMN: &str = "salt";

const MSG_SUCCESS: &str = "Authentication successful.";
const MSG_CREDENTIAL_INVALID: &str = "Supplied credential is invalid.";
const MSG_IDENTITY_NOT_FOUND: &str = "A record with the supplied identity could not be found.";
const MSG_AMBIGUOUS_IDENTITY: &str = "More than one record matches the supplied identity.";

/// One-shot credential authenticator over an identity store.
///
/// Holds no per-attempt state; a single instance is safe to share across
/// concurrent `authenticate` calls.
#[derive(Clone)]
pub struct CredentialAuthenticator<S> {
    store: S,
    credential_column: String,
    salt_column: String,
}

impl<S: IdentityStore> CredentialAuthenticator<S> {
    /// Authenticator with the default column names
    pub fn new(store: S) -> Self {
        Self::with_columns(store, DEFAULT_CREDENTIAL_COLUMN, DEFAULT_SALT_COLUMN)
    }

    /// Authenticator with explicit credential and salt column names
    pub fn with_columns(
        store: S,
        credential_column: impl Into<String>,
        salt_column: impl Into<String>,
    ) -> Self {
        Self {
            store,
            credential_column: credential_column.into(),
            salt_column: salt_column.into(),
        }
    }

    /// Run one authentication attempt.
    ///
    /// Returns `Err` only for caller or environment faults (empty inputs,
    /// store breakage, records violating the store contract); every
    /// expected outcome arrives as `Ok(AuthResult)`.
    pub async fn authenticate(
        &self,
        identity: &str,
        credential: &str,
    ) -> Result<AuthResult, AuthError> {
        check_inputs(identity, credential)?;
        counter!("auth.attempts").increment(1);
        debug!(identity, "authentication attempt");

        let rows = self.store.find_by_identifier(identity).await?;
        let result = match validate_result_set(rows) {
            Ok(record) => self.verify_credential(record, credential)?,
            Err(early) => early,
        };

        if result.is_success() {
            counter!("auth.success").increment(1);
        } else {
            counter!("auth.failure").increment(1);
            if result.outcome() == AuthOutcome::AmbiguousIdentity {
                // data-integrity alarm, not a retryable condition
                warn!(identity, "multiple identity records match one identifier");
            }
        }
        Ok(result)
    }

    /// Compare the supplied credential against the stored hash and assemble
    /// the final result, stripping hash material from the record on success.
    fn verify_credential(
        &self,
        mut record: IdentityRecord,
        credential: &str,
    ) -> Result<AuthResult, AuthError> {
        let stored = record
            .get_str(&self.credential_column)
            .ok_or_else(|| {
                AuthError::InvalidConfig(format!(
                    "identity record has no usable '{}' column",
                    self.credential_column
                ))
            })?
            .to_string();

        if !verify_password(&stored, credential) {
            return Ok(AuthResult::failure(
                AuthOutcome::CredentialInvalid,
                MSG_CREDENTIAL_INVALID,
            ));
        }

        record.remove(&self.credential_column);
        record.remove(&self.salt_column);
        Ok(AuthResult::success(record, MSG_SUCCESS))
    }
}

impl CredentialAuthenticator<FlatFileIdentityStore> {
    /// Wire an authenticator over the flat-file store the settings describe.
    pub fn from_settings(settings: &Settings) -> Self {
        let store = FlatFileIdentityStore::new(&settings.store_path, &settings.identity_column);
        Self::with_columns(store, &settings.credential_column, &settings.salt_column)
    }
}

/// Both inputs must be present before any store traffic.
fn check_inputs(identity: &str, credential: &str) -> Result<(), AuthError> {
    if identity.is_empty() {
        return Err(AuthError::InvalidConfig(
            "A value for the identity was not provided prior to authentication.".to_string(),
        ));
    }
    if credential.is_empty() {
        return Err(AuthError::InvalidConfig(
            "A credential value was not provided prior to authentication.".to_string(),
        ));
    }
    Ok(())
}

/// Exactly one row may match; zero and many short-circuit into failure
/// results. A multi-row match is never resolved by picking one arbitrarily.
fn validate_result_set(mut rows: Vec<IdentityRecord>) -> Result<IdentityRecord, AuthResult> {
    match rows.len() {
        0 => Err(AuthResult::failure(
            AuthOutcome::IdentityNotFound,
            MSG_IDENTITY_NOT_FOUND,
        )),
        1 => Ok(rows.remove(0)),
        _ => Err(AuthResult::failure(
            AuthOutcome::AmbiguousIdentity,
            MSG_AMBIGUOUS_IDENTITY,
        )),
    }
}
