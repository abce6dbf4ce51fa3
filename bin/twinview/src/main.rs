//! # TwinView Binary
//!
//! The entry point that assembles the image workspace server.

mod config;

use std::sync::Arc;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use tv_api::middleware::{cors_policy, security_headers, standard_middleware};
use tv_api::{configure_routes, AppState};
use tv_store_memory::MemoryImageRepo;
use tv_thumbs_image::PngThumbnailer;

use crate::config::ServerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cfg = ServerConfig::from_env()?;

    // The store is process-scoped: everything uploaded is gone on restart.
    let state = web::Data::new(
        AppState::new(Box::new(MemoryImageRepo::new()), Arc::new(PngThumbnailer::default()))
            .with_max_upload_bytes(cfg.max_upload_bytes),
    );

    let static_dir = cfg.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        log::warn!("static directory {} not found, /static is disabled", static_dir.display());
    }

    log::info!("TwinView starting on http://{}:{}", cfg.host, cfg.port);

    HttpServer::new(move || {
        let app = App::new()
            .wrap(security_headers())
            .wrap(cors_policy())
            .wrap(standard_middleware())
            .app_data(state.clone())
            .configure(configure_routes);

        if serve_static {
            app.service(Files::new("/static", static_dir.clone()))
        } else {
            app
        }
    })
    .bind((cfg.host.clone(), cfg.port))?
    .run()
    .await?;

    Ok(())
}
