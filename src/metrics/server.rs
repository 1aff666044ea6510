use actix_web::{web, HttpResponse, Responder};
use prometheus::{Encoder, TextEncoder};

use super::Metrics;
use crate::store::{CustomerStore, HealthStatus};

const SERVICE_NAME: &str = "customer-service";

/// Register the /metrics and /health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

async fn metrics_handler(metrics: web::Data<Metrics>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Metrics encoding error: {}", e);
        return HttpResponse::InternalServerError().body("Internal server error");
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn health_handler(store: web::Data<dyn CustomerStore>) -> impl Responder {
    match store.health().await {
        HealthStatus::Healthy => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "store": "up"
        })),
        HealthStatus::Unhealthy(reason) => {
            tracing::warn!(reason = %reason, "Store health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "store": "down"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CustomerStore, InMemoryCustomerStore};
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_reports_store_up() {
        let store: Arc<dyn CustomerStore> = Arc::new(InMemoryCustomerStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .app_data(web::Data::new(Metrics::new().unwrap()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "up");
    }

    #[actix_web::test]
    async fn test_metrics_exposition() {
        let metrics = web::Data::new(Metrics::new().unwrap());
        metrics.record_request("read_all", "ok");

        let app = test::init_service(App::new().app_data(metrics).configure(configure)).await;

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("customer_requests_total"));
        assert!(text.contains("operation=\"read_all\""));
    }
}
