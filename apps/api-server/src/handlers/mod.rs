//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

use actix_web::{HttpResponse, error, web};

use blog_shared::ErrorResponse;

fn bad_request(detail: String) -> actix_web::Error {
    error::InternalError::from_response(
        detail.clone(),
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail)),
    )
    .into()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err.to_string())))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                .service(web::scope("/auth").route("/login", web::post().to(auth::login)))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete))
                        .route("/{id}/status", web::put().to(posts::change_status)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::post().to(users::create))
                        .route("/me", web::get().to(users::me))
                        .route("/me", web::put().to(users::update_me))
                        .route("/me/change-password", web::post().to(users::change_password)),
                ),
        );
}
