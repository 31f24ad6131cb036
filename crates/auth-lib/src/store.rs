// ============================
// crates/auth-lib/src/store.rs
// ============================
//! Identity store abstraction with flat-file and in-memory implementations.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs as tokio_fs;

use credauth_common::IdentityRecord;

use crate::error::AuthError;

/// Trait for identity store backends.
///
/// A lookup returns every record whose identity column matches the supplied
/// identifier; case and collation rules belong to the backend, not to the
/// caller. Backend failures are hard errors, reported once per call.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<IdentityRecord>, AuthError>;
}

/// Flat-file implementation of the [`IdentityStore`] trait.
///
/// The backing file holds a JSON array of records, one object per identity
/// row. A missing or unreadable file is an error; an empty store must be an
/// empty array, so misconfiguration cannot masquerade as "identity not
/// found".
#[derive(Clone)]
pub struct FlatFileIdentityStore {
    path: PathBuf,
    identity_column: String,
}

impl FlatFileIdentityStore {
    pub fn new<P: AsRef<Path>>(path: P, identity_column: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            identity_column: identity_column.into(),
        }
    }
}

#[async_trait]
impl IdentityStore for FlatFileIdentityStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<IdentityRecord>, AuthError> {
        let content = tokio_fs::read_to_string(&self.path).await?;
        let records: Vec<IdentityRecord> = serde_json::from_str(&content)?;

        Ok(records
            .into_iter()
            .filter(|record| {
                matches!(
                    record.get(&self.identity_column),
                    Some(Value::String(value)) if value == identifier
                )
            })
            .collect())
    }
}

/// In-memory implementation of the [`IdentityStore`] trait, for tests and
/// for embedders that assemble records themselves.
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    identity_column: String,
    records: Vec<IdentityRecord>,
}

impl MemoryIdentityStore {
    pub fn new(identity_column: impl Into<String>) -> Self {
        Self {
            identity_column: identity_column.into(),
            records: Vec::new(),
        }
    }

    /// Add a record to the store
    pub fn insert(&mut self, record: IdentityRecord) {
        self.records.push(record);
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<IdentityRecord>, AuthError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.get_str(&self.identity_column) == Some(identifier))
            .cloned()
            .collect())
    }
}
