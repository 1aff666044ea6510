use std::future::Future;
use std::time::Instant;

use actix_web::{http::StatusCode, web, HttpResponse};

use super::{messages, text};
use crate::metrics::Metrics;
use crate::models::{CustomerRequest, ValidationError};
use crate::store::{CustomerStore, StoreError};

// ============================================================================
// Customer Handlers
// ============================================================================
//
// Request → validate → store call → status + plain text (or JSON record).
// No failure escapes as an actix error; every branch builds a response.
//
// Status mapping kept for client compatibility:
// - an empty list is 404, not 200 with []
// - a duplicate on update is 404, while the same error on create is 400
// - any delete-all failure is 404
//
// ============================================================================

type Store = web::Data<dyn CustomerStore>;

async fn timed<F, T>(metrics: &Metrics, operation: &str, call: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let result = call.await;
    metrics.observe_store(operation, start.elapsed().as_secs_f64());
    result
}

fn invalid_request(metrics: &Metrics, operation: &str, error: ValidationError) -> HttpResponse {
    tracing::debug!(operation, error = %error, "Rejected invalid customer payload");
    metrics.record_request(operation, "invalid_request");
    text(StatusCode::BAD_REQUEST, error.to_string())
}

/// Log and count a store failure, answering with `status`
fn store_failure(
    metrics: &Metrics,
    operation: &str,
    error: StoreError,
    status: StatusCode,
) -> HttpResponse {
    match &error {
        StoreError::StorageFault(source) => {
            tracing::error!(operation, error = %source, "Customer store failure");
        }
        StoreError::IdsExhausted => {
            tracing::error!(operation, "Customer id space exhausted");
        }
        other => {
            tracing::info!(operation, error = %other, "Customer request refused");
        }
    }
    metrics.record_request(operation, error.kind());
    text(status, error.to_string())
}

pub async fn create(
    store: Store,
    metrics: web::Data<Metrics>,
    body: web::Json<CustomerRequest>,
) -> HttpResponse {
    const OP: &str = "create";

    // Any id in the body is ignored; create always inserts
    let details = match body.into_inner().validate() {
        Ok((_, details)) => details,
        Err(e) => return invalid_request(&metrics, OP, e),
    };

    match timed(&metrics, "save", store.save(None, details)).await {
        Ok(customer) => {
            tracing::info!(customer_id = customer.id, "✅ Customer created");
            metrics.record_request(OP, "ok");
            text(StatusCode::CREATED, messages::SAVE_SUCCESS)
        }
        Err(e @ StoreError::DuplicateContact(_)) => {
            store_failure(&metrics, OP, e, StatusCode::BAD_REQUEST)
        }
        Err(e) => store_failure(&metrics, OP, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn read_all(store: Store, metrics: web::Data<Metrics>) -> HttpResponse {
    const OP: &str = "read_all";

    match timed(&metrics, "find_all", store.find_all()).await {
        Ok(customers) => {
            metrics.customer_records.set(customers.len() as i64);
            if customers.is_empty() {
                metrics.record_request(OP, "empty");
                return text(StatusCode::NOT_FOUND, messages::RECORD_NOT_FOUND);
            }
            metrics.record_request(OP, "ok");
            HttpResponse::Ok().json(customers)
        }
        Err(e) => store_failure(&metrics, OP, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn read_by_id(
    store: Store,
    metrics: web::Data<Metrics>,
    path: web::Path<i32>,
) -> HttpResponse {
    const OP: &str = "read_by_id";
    let id = path.into_inner();

    match timed(&metrics, "find_by_id", store.find_by_id(id)).await {
        Ok(customer) => {
            metrics.record_request(OP, "ok");
            HttpResponse::Ok().json(customer)
        }
        Err(e @ StoreError::NotFound(_)) => store_failure(&metrics, OP, e, StatusCode::NOT_FOUND),
        Err(e) => store_failure(&metrics, OP, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn update(
    store: Store,
    metrics: web::Data<Metrics>,
    body: web::Json<CustomerRequest>,
) -> HttpResponse {
    const OP: &str = "update";

    let (id, details) = match body.into_inner().validate_with_id() {
        Ok(validated) => validated,
        Err(e) => return invalid_request(&metrics, OP, e),
    };

    match timed(&metrics, "save", store.save(Some(id), details)).await {
        Ok(customer) => {
            tracing::info!(customer_id = customer.id, "✅ Customer updated");
            metrics.record_request(OP, "ok");
            text(StatusCode::OK, messages::UPDATE_SUCCESS)
        }
        Err(e @ StoreError::DuplicateContact(_)) => {
            store_failure(&metrics, OP, e, StatusCode::NOT_FOUND)
        }
        Err(e) => store_failure(&metrics, OP, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn delete_by_id(
    store: Store,
    metrics: web::Data<Metrics>,
    path: web::Path<i32>,
) -> HttpResponse {
    const OP: &str = "delete_by_id";
    let id = path.into_inner();

    match timed(&metrics, "delete_by_id", store.delete_by_id(id)).await {
        Ok(()) => {
            tracing::info!(customer_id = id, "🗑️ Customer deleted");
            metrics.record_request(OP, "ok");
            text(StatusCode::OK, messages::customer_deleted(id))
        }
        Err(e @ StoreError::NotFound(_)) => store_failure(&metrics, OP, e, StatusCode::NOT_FOUND),
        Err(e) => store_failure(&metrics, OP, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn delete_all(store: Store, metrics: web::Data<Metrics>) -> HttpResponse {
    const OP: &str = "delete_all";

    match timed(&metrics, "delete_all", store.delete_all()).await {
        Ok(count) => {
            tracing::info!(count, "🗑️ All customers deleted");
            metrics.customer_records.set(0);
            metrics.record_request(OP, "ok");
            text(StatusCode::OK, messages::all_customers_deleted(count))
        }
        Err(e) => store_failure(&metrics, OP, e, StatusCode::NOT_FOUND),
    }
}
