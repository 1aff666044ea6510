// ============================================================================
// Customer API - HTTP surface under /customer
// ============================================================================
//
// POST   /customer        create
// GET    /customer        read all
// GET    /customer/{id}   read by id
// PUT    /customer        update (id in body)
// DELETE /customer/{id}   delete by id
// DELETE /customer        delete all
//
// ============================================================================

mod handlers;
pub mod messages;

use actix_web::error::InternalError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

/// Register the customer routes and the extractor error handlers
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/customer")
                .route("", web::post().to(handlers::create))
                .route("", web::get().to(handlers::read_all))
                .route("", web::put().to(handlers::update))
                .route("", web::delete().to(handlers::delete_all))
                .route("/{id}", web::get().to(handlers::read_by_id))
                .route("/{id}", web::delete().to(handlers::delete_by_id)),
        );
}

/// Plain text response
pub(crate) fn text(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::plaintext())
        .body(body.into())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = text(StatusCode::BAD_REQUEST, format!("Invalid request body: {err}"));
        InternalError::from_response(err, response).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = text(StatusCode::BAD_REQUEST, "Invalid customer id");
        InternalError::from_response(err, response).into()
    })
}

// ============================================================================
// HTTP Tests (against the in-memory store)
// ============================================================================
