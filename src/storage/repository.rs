//! The data-access contract used by the HTTP layer.

use crate::domain::model::{Pet, PetRecord};
use crate::storage::StoreError;
use async_trait::async_trait;

/// A session against the pet store.
///
/// Nothing is auto-committed: writes (and reads issued after them) belong to the
/// current transaction until `commit` or `rollback` is called.
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Idempotently creates the `owners` and `pets` tables.
    async fn create_schema(&mut self) -> Result<(), StoreError>;

    /// Inserts a pet, resolving `record.owner` to an owner id first.
    /// Returns the new pet id. Fails with `OwnerNotFound` without writing.
    async fn insert(&mut self, record: &PetRecord) -> Result<i32, StoreError>;

    /// Replaces every field of pet `id`. Fails with `OwnerNotFound` without writing.
    async fn update(&mut self, id: i32, record: &PetRecord) -> Result<(), StoreError>;

    async fn delete(&mut self, id: i32) -> Result<(), StoreError>;

    /// All pets joined with their owner's name, ordered by id. Rows that cannot be
    /// decoded are skipped.
    async fn list_pets(&mut self) -> Result<Vec<Pet>, StoreError>;

    async fn get_pet(&mut self, id: i32) -> Result<Option<Pet>, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;

    /// Whether a transaction is currently open on this session.
    fn in_transaction(&self) -> bool;

    /// Rolls back any open transaction and closes the session.
    async fn disconnect(&mut self) -> Result<(), StoreError>;

    /// Cheap liveness probe used by `/health`.
    async fn ping(&mut self) -> Result<(), StoreError>;
}
