//! HTTP handlers and route configuration.

mod ai;
mod authors;
mod editor;
mod health;
mod posts;
mod taxonomy;
mod views;


use actix_web::web;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_published))
            .route("/posts/{slug}", web::get().to(posts::get_published))
            .route("/categories", web::get().to(taxonomy::categories))
            .route("/tags", web::get().to(taxonomy::tags))
            // Owner routes
            .service(
                web::scope("/admin")
                    .route("/posts", web::get().to(posts::list_own))
                    .route("/posts", web::post().to(posts::create))
                    .route("/posts/{slug}", web::get().to(posts::get_own))
                    .route("/posts/{id}", web::put().to(posts::update))
                    .route("/posts/{id}", web::delete().to(posts::delete))
                    .route("/authors", web::get().to(authors::list))
                    .route("/authors", web::post().to(authors::create)),
            )
            // Model-backed routes
            .service(
                web::scope("/ai")
                    .wrap(RateLimitMiddleware)
                    .route("/generate-article", web::post().to(ai::generate_article))
                    .route("/rephrase", web::post().to(ai::rephrase)),
            )
            .service(
                web::scope("/editor/sessions")
                    .route("", web::post().to(editor::open))
                    .route("/{id}", web::get().to(editor::get))
                    .route("/{id}", web::delete().to(editor::close))
                    .route("/{id}/commands", web::post().to(editor::command)),
            ),
    );
}
