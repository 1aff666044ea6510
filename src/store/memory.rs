use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ContactField, CustomerStore, HealthStatus, StoreError};
use crate::models::{Customer, CustomerDetails};

struct Table {
    rows: BTreeMap<i32, Customer>,
    // i64 so it can sit one past i32::MAX; always above every id ever stored
    next_id: i64,
}

impl Table {
    fn allocate_id(&mut self) -> Result<i32, StoreError> {
        let id = i32::try_from(self.next_id).map_err(|_| StoreError::IdsExhausted)?;
        self.next_id = i64::from(id) + 1;
        Ok(id)
    }

    fn reserve_id(&mut self, id: i32) {
        self.next_id = self.next_id.max(i64::from(id) + 1);
    }

    fn conflict(&self, id: Option<i32>, details: &CustomerDetails) -> Option<ContactField> {
        let others = self.rows.values().filter(|c| Some(c.id) != id);
        let (email, mobile) = others.fold((false, false), |(email, mobile), c| {
            (
                email || c.email == details.email,
                mobile || c.mobile_number == details.mobile_number,
            )
        });
        ContactField::from_flags(email, mobile)
    }
}

/// Customer store held in process memory. The whole table sits behind one
/// mutex, so the uniqueness check and the write happen under the same lock.
pub struct InMemoryCustomerStore {
    table: Mutex<Table>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn save(
        &self,
        id: Option<i32>,
        details: CustomerDetails,
    ) -> Result<Customer, StoreError> {
        let mut table = self.table.lock().await;

        if let Some(field) = table.conflict(id, &details) {
            tracing::debug!(?id, %field, "Rejected save with duplicate contact");
            return Err(StoreError::DuplicateContact(field));
        }

        let id = match id {
            Some(id) => {
                table.reserve_id(id);
                id
            }
            None => table.allocate_id()?,
        };

        let customer = details.into_customer(id);
        table.rows.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Customer, StoreError> {
        let table = self.table.lock().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut table = self.table.lock().await;
        let removed = table.rows.len() as u64;
        table.rows.clear();
        Ok(removed)
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}
