use std::sync::Arc;

use actix_web::web;
use checkout_service::infrastructure::payment_gateway::HttpPaymentGateway;
use checkout_service::{build_server, create_pool, run_migrations, AppConfig, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().expect("Invalid configuration");
    if config.gateway.secret_key.is_none() {
        log::error!("PAYMENT_GATEWAY_SECRET_KEY is not set; every checkout will fail");
    }

    let pool =
        create_pool(&config.database_url).expect("Failed to create database connection pool");
    run_migrations(&pool).expect("Failed to run database migrations");

    let gateway =
        HttpPaymentGateway::new(&config.gateway).expect("Invalid payment gateway settings");
    let state = web::Data::new(AppState::new(pool, Arc::new(gateway)));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
