// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! exchanged between the `credauth` engine and the session/authorization
//! logic layered above it. This crate defines the identity-store row
//! representation and the structured result of an authentication attempt.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row fetched from the identity store: a flat mapping of column name
/// to value.
///
/// Records arriving from a store carry every column of the matching row,
/// including the stored credential hash and any legacy salt column; the
/// authenticator strips those before a record is handed back to callers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct IdentityRecord {
    columns: Map<String, Value>,
}

impl IdentityRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a column, if present
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// String value of a column, if present and actually a string
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(Value::as_str)
    }

    /// Set a column, replacing any previous value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Remove a column, returning its value if it was present
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    /// Whether a column is present
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.columns.iter()
    }
}

impl From<Map<String, Value>> for IdentityRecord {
    fn from(columns: Map<String, Value>) -> Self {
        Self { columns }
    }
}

impl FromIterator<(String, Value)> for IdentityRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Outcome of one authentication attempt
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The supplied credential matched the stored hash
    Success,
    /// Exactly one record matched the identity but the credential did not
    CredentialInvalid,
    /// No record matched the supplied identity
    IdentityNotFound,
    /// More than one record matched the supplied identity
    AmbiguousIdentity,
}

/// Structured result of one authentication attempt.
///
/// Built once per attempt and immutable afterwards. The sanitized identity
/// record is attached only on success; failure results never carry one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthResult {
    outcome: AuthOutcome,
    messages: Vec<String>,
    identity: Option<IdentityRecord>,
}

impl AuthResult {
    /// Build a failure result carrying one human-readable message
    pub fn failure(outcome: AuthOutcome, message: impl Into<String>) -> Self {
        debug_assert!(outcome != AuthOutcome::Success);
        Self {
            outcome,
            messages: vec![message.into()],
            identity: None,
        }
    }

    /// Build a success result around a sanitized identity record
    pub fn success(identity: IdentityRecord, message: impl Into<String>) -> Self {
        Self {
            outcome: AuthOutcome::Success,
            messages: vec![message.into()],
            identity: Some(identity),
        }
    }

    pub fn outcome(&self) -> AuthOutcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AuthOutcome::Success
    }

    /// Outcome-specific messages, for internal logging and operator tooling
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Sanitized identity record; `Some` only on success
    pub fn identity(&self) -> Option<&IdentityRecord> {
        self.identity.as_ref()
    }

    /// Consume the result, yielding the sanitized identity record
    pub fn into_identity(self) -> Option<IdentityRecord> {
        self.identity
    }

    /// Uniform message safe to show an external caller.
    ///
    /// Every failure outcome maps to the same wording so a caller cannot
    /// learn whether the identity exists; the specific reason stays in
    /// [`messages`](Self::messages).
    pub fn public_message(&self) -> &'static str {
        match self.outcome {
            AuthOutcome::Success => "Authentication successful.",
            _ => "Supplied identity or credential is invalid.",
        }
    }
}
