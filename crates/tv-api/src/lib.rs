//! # tv-api
//!
//! The web routing and orchestration layer for TwinView.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use error::ApiError;
pub use handlers::AppState;

/// Configures the routes for the image workspace.
///
/// # Developer Note
/// Paths are fixed because the bundled page script calls them directly.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/upload", web::post().to(handlers::upload))
        .route("/images", web::get().to(handlers::list_images))
        .route("/image/{id}", web::get().to(handlers::get_image))
        .route("/thumbnail/{id}", web::get().to(handlers::get_thumbnail))
        .route("/toggle/{id}", web::post().to(handlers::toggle))
        .route("/delete_deactivated", web::post().to(handlers::delete_deactivated));
}
