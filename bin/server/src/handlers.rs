//! HTTP request handlers

pub mod error;
pub mod health;
pub mod upload;

use actix_web::web;
use common::UPLOAD_PREFIX;

/// Register the upload and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("{}{{path:.*}}", UPLOAD_PREFIX))
            .route(web::put().to(upload::upload)),
    )
    .service(health::health);
}
