//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs and infra/blob.

use crate::contract::{Profile, Record};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for an owner-scoped table
///
/// Every lookup filters on the owner; a row owned by someone else behaves
/// exactly like a missing row.
#[async_trait]
pub trait OwnedRepository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Insert a new row; the storage layer assigns both timestamps
    async fn insert(&self, record: &Record<T>) -> Result<Record<T>>;

    /// Find a row by id
    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<T>>>;

    /// All rows of an owner, newest first
    async fn list(&self, owner: Uuid) -> Result<Vec<Record<T>>>;

    /// Replace the editable fields of a row; `None` if no row matched
    async fn update(&self, record: &Record<T>) -> Result<Option<Record<T>>>;

    /// Delete a row; returns whether a row was removed
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool>;
}

/// Repository for user profiles and their credentials
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create a profile together with its password hash
    async fn create(&self, profile: &Profile, password_hash: &str) -> Result<Profile>;

    /// Find a profile by user id
    async fn find(&self, id: Uuid) -> Result<Option<Profile>>;

    /// Find a profile and its password hash by e-mail (case-insensitive)
    async fn find_credentials(&self, email: &str) -> Result<Option<(Profile, String)>>;

    /// Update editable profile fields
    async fn update(&self, profile: &Profile) -> Result<Option<Profile>>;
}

/// Binary object storage for uploaded files
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a key, replacing any previous object
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read an object; `None` if the key does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove an object; missing keys are not an error
    async fn delete(&self, key: &str) -> Result<()>;
}
