use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use shop_catalog::config::Settings;
use shop_catalog::db::{self, PgShopRepository};
use shop_catalog::handlers::{self, AppState};
use shop_catalog::service::CatalogService;
use shop_catalog::telemetry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    telemetry::init(&settings.log);

    let pool = db::build_pool(&settings.database).context("failed to create pool")?;
    if settings.database.run_migrations {
        let applied = db::run_migrations(&pool).context("failed to run migrations")?;
        tracing::info!(applied, "database schema is up to date");
    }

    let repo = Arc::new(PgShopRepository::new(pool));
    let service = Arc::new(CatalogService::new(repo));
    let app_state = web::Data::new(AppState::new(service));

    let (host, port) = settings.bind_address();
    tracing::info!("starting HTTP server on http://{host}:{port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}
