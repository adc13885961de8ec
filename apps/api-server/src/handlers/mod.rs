//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpRequest, HttpResponse, error, web};
use blog_core::PostError;
use blog_shared::ErrorResponse;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/healthz", web::get().to(health::liveness))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        // Registered before `/{id}` so it is not captured as an id.
                        .service(
                            web::resource("/metrics/by-tag")
                                .route(web::get().to(posts::metrics_by_tag))
                                .default_service(web::to(method_not_allowed)),
                        )
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post))
                                .default_service(web::to(method_not_allowed)),
                        )
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::put().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post))
                                .default_service(web::to(method_not_allowed)),
                        ),
                ),
        );
}

/// Fallback for unmatched paths.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::route_not_found(req.path()))
}

async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::method_not_allowed(req.method().as_str()))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(PostError::invalid_input(format!("malformed JSON body: {err}"))).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req| {
        AppError::from(PostError::invalid_input(format!("malformed query string: {err}"))).into()
    })
}
