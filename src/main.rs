use std::time::Duration;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use form_intake::{
    background_task::start_ip_window_eviction,
    db::{postgres::create_pool, schema::ensure_schema},
    dns::mx::DnsMailVerifier,
    graceful_shutdown::shutdown_signal,
    repositories::sqlx_repo::{SqlxContactMessageRepo, SqlxServiceRequestRepo},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    use_cases::abuse_guard::AbuseGuard,
    web::{cors::build_cors, telemetry::init_tracing},
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(&cfg.env);
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            init_tracing(&AppEnvironment::Development);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url, config.max_db_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ensure_schema(&pool).await {
        tracing::error!("Schema bootstrap failed: {:#}", e);
        std::process::exit(1);
    }

    let guard = AbuseGuard::from_settings(&config.rate_limit);
    let ip_limiter = guard.ip_limiter().clone();

    let app_state = web::Data::new(AppState::new(&config, pool, guard));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        ip_max = config.rate_limit.ip_max,
        window_secs = config.rate_limit.window_secs,
        email_cooldown_secs = config.rate_limit.email_cooldown_secs,
        verify_mx = config.verify_mx,
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_origins = config.cors_origins();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes::<SqlxContactMessageRepo, SqlxServiceRequestRepo, DnsMailVerifier>)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_ip_window_eviction(
        ip_limiter,
        Duration::from_secs(config.rate_limit.eviction_interval_secs.max(1)),
    ));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
