// ============================================================================
// Customer Store - Persistence Layer
// ============================================================================
//
// One async trait, two backends:
// - PgCustomerStore: PostgreSQL through sqlx
// - InMemoryCustomerStore: process-local map, used by tests and local runs
//
// Both enforce the email / mobile number uniqueness invariant atomically
// with the write.
//
// ============================================================================

mod errors;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::models::{Customer, CustomerDetails};

pub use errors::{ContactField, StoreError};
pub use memory::InMemoryCustomerStore;
pub use postgres::PgCustomerStore;

/// Health of a store backend
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert when `id` is `None`, otherwise fully replace (or insert) the
    /// record with that id. Fails with `DuplicateContact` if another record
    /// already uses the email or mobile number.
    async fn save(&self, id: Option<i32>, details: CustomerDetails)
        -> Result<Customer, StoreError>;

    /// Every record, ordered by id
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Customer, StoreError>;

    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError>;

    /// Remove every record and return how many were removed
    async fn delete_all(&self) -> Result<u64, StoreError>;

    async fn health(&self) -> HealthStatus;
}
