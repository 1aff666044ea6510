use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{ContactField, CustomerStore, HealthStatus, StoreError};
use crate::settings::StoreConfig;
use crate::models::{Customer, CustomerDetails};
use crate::utils::{retry_on_transient, RetryConfig, RetryResult};

// ============================================================================
// PostgreSQL Customer Store
// ============================================================================
//
// Uniqueness is enforced twice:
// 1. Inside the write transaction, after taking a SHARE ROW EXCLUSIVE lock
//    on the table, a single query checks other records for the email or
//    mobile number. Concurrent saves serialize on that lock.
// 2. UNIQUE constraints on both columns. A violation that slips past the
//    check is still reported as DuplicateContact.
//
// ============================================================================

const EMAIL_CONSTRAINT: &str = "customer_email_key";
const MOBILE_NUMBER_CONSTRAINT: &str = "customer_mobile_number_key";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS customer (
        id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL CONSTRAINT customer_email_key UNIQUE,
        mobile_number TEXT NOT NULL CONSTRAINT customer_mobile_number_key UNIQUE
    )";

const LOCK_TABLE: &str = "LOCK TABLE customer IN SHARE ROW EXCLUSIVE MODE";

// $3 is NULL for new records, so every row counts as "other"
const FIND_CONFLICT: &str = "SELECT bool_or(email = $1), bool_or(mobile_number = $2)
     FROM customer
     WHERE ($3::INTEGER IS NULL OR id <> $3)
       AND (email = $1 OR mobile_number = $2)";

const INSERT: &str = "INSERT INTO customer (name, email, mobile_number)
     VALUES ($1, $2, $3)
     RETURNING id, name, email, mobile_number";

const UPSERT: &str = "INSERT INTO customer (id, name, email, mobile_number)
     VALUES ($1, $2, $3, $4)
     ON CONFLICT (id) DO UPDATE
        SET name = EXCLUDED.name,
            email = EXCLUDED.email,
            mobile_number = EXCLUDED.mobile_number
     RETURNING id, name, email, mobile_number";

// Moves the identity generator past an explicitly supplied id ($1). nextval
// makes the sequence only ever advance; the value it burns is never handed out.
const ADVANCE_ID_SEQUENCE: &str = "SELECT setval(
        pg_get_serial_sequence('customer', 'id'),
        GREATEST($1::INTEGER, nextval(pg_get_serial_sequence('customer', 'id')))
    )";

const SELECT_ALL: &str = "SELECT id, name, email, mobile_number FROM customer ORDER BY id";

const SELECT_BY_ID: &str = "SELECT id, name, email, mobile_number FROM customer WHERE id = $1";

const DELETE_BY_ID: &str = "DELETE FROM customer WHERE id = $1";

const DELETE_ALL: &str = "DELETE FROM customer";

pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with retry on transient failures, then make sure the table exists
    pub async fn connect(config: &StoreConfig) -> anyhow::Result<Self> {
        let retry = RetryConfig::with_attempts(config.connect_attempts);

        let pool = match retry_on_transient(retry, |attempt| {
            tracing::info!(attempt, "Connecting to PostgreSQL...");
            PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
        })
        .await
        {
            RetryResult::Success(pool) => pool,
            RetryResult::Failed(e) | RetryResult::PermanentFailure(e) => {
                return Err(anyhow::anyhow!("Could not connect to PostgreSQL: {}", e));
            }
        };

        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::info!("✅ Customer table ready");
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn save(
        &self,
        id: Option<i32>,
        details: CustomerDetails,
    ) -> Result<Customer, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(LOCK_TABLE).execute(&mut *tx).await?;

        let (email_taken, mobile_taken): (Option<bool>, Option<bool>) =
            sqlx::query_as(FIND_CONFLICT)
                .bind(&details.email)
                .bind(&details.mobile_number)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let conflict = ContactField::from_flags(
            email_taken.unwrap_or(false),
            mobile_taken.unwrap_or(false),
        );
        if let Some(field) = conflict {
            tracing::debug!(?id, %field, "Rejected save with duplicate contact");
            return Err(StoreError::DuplicateContact(field));
        }

        let customer: Customer = match id {
            None => sqlx::query_as(INSERT)
                .bind(&details.name)
                .bind(&details.email)
                .bind(&details.mobile_number)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_write_error)?,
            Some(id) => {
                let customer: Customer = sqlx::query_as(UPSERT)
                    .bind(id)
                    .bind(&details.name)
                    .bind(&details.email)
                    .bind(&details.mobile_number)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_write_error)?;
                sqlx::query(ADVANCE_ID_SEQUENCE)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                customer
            }
        };

        tx.commit().await.map_err(map_write_error)?;

        Ok(customer)
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let customers = sqlx::query_as(SELECT_ALL).fetch_all(&self.pool).await?;
        Ok(customers)
    }

    async fn find_by_id(&self, id: i32) -> Result<Customer, StoreError> {
        sqlx::query_as(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query(DELETE_BY_ID).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_ALL).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn health(&self) -> HealthStatus {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

fn contact_field_for_constraint(constraint: &str) -> Option<ContactField> {
    match constraint {
        EMAIL_CONSTRAINT => Some(ContactField::Email),
        MOBILE_NUMBER_CONSTRAINT => Some(ContactField::MobileNumber),
        _ => None,
    }
}

/// Turn a unique violation on a contact column into DuplicateContact
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(contact_field_for_constraint) {
                tracing::warn!(%field, "Unique constraint caught a duplicate contact");
                return StoreError::DuplicateContact(field);
            }
        }
    }
    StoreError::StorageFault(err)
}

// ============================================================================
// Unit Tests
// ============================================================================
