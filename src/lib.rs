pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::checkout::checkout,
        handlers::orders::get_order,
        handlers::orders::update_order_status,
        handlers::orders::list_seller_orders,
        handlers::orders::list_buyer_orders,
        handlers::carts::view_cart,
        handlers::carts::set_quantity,
        handlers::carts::remove_item,
    ),
    tags(
        (name = "checkout", description = "Multi-vendor checkout"),
        (name = "orders", description = "Global and seller-scoped order ledgers"),
        (name = "cart", description = "Buyer carts"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}

/// Registers every API route. Shared by the server and handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout", web::post().to(handlers::checkout::checkout))
        .service(
            web::scope("/orders")
                .route("/{order_id}", web::get().to(handlers::orders::get_order))
                .route(
                    "/{order_id}/status",
                    web::patch().to(handlers::orders::update_order_status),
                ),
        )
        .route(
            "/sellers/{seller_id}/orders",
            web::get().to(handlers::orders::list_seller_orders),
        )
        .service(
            web::scope("/buyers/{buyer_id}")
                .route("/orders", web::get().to(handlers::orders::list_buyer_orders))
                .route("/cart", web::get().to(handlers::carts::view_cart))
                .route(
                    "/cart/{product_id}",
                    web::put().to(handlers::carts::set_quantity),
                )
                .route(
                    "/cart/{product_id}",
                    web::delete().to(handlers::carts::remove_item),
                ),
        );
}
