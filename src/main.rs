use std::sync::Arc;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_contact::{
    background_task::start_rate_limit_sweep,
    db::postgres::{connect_store, run_migrations},
    graceful_shutdown::shutdown_signal,
    limiter::{
        rate_limiter::{InMemoryRateLimiter, RateLimitPolicy, RateLimitStore},
        redis_limiter::RedisRateLimiter,
    },
    middlewares::cors::{cors_headers, cors_layer},
    repositories::sqlx_repo::SqlxContactRepo,
    email::resend::ResendMailer,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.env);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = connect_store(config.database_url.as_deref()).await;
    if let Some(pool) = &pool {
        if let Err(e) = run_migrations(pool).await {
            tracing::error!(error = %e, "Failed to run database migrations");
        }
    }

    let policy = RateLimitPolicy::from(&config);
    let limiter: Arc<dyn RateLimitStore> = match config.redis_url.as_deref() {
        Some(url) => match connect_redis_limiter(url, policy).await {
            Ok(limiter) => {
                tracing::info!("Using Redis for contact rate limiting");
                Arc::new(limiter)
            }
            Err(e) => {
                tracing::error!(error = %e, "Redis unavailable, using in-memory rate limiting");
                spawn_memory_limiter(&config, policy)
            }
        },
        None => spawn_memory_limiter(&config, policy),
    };

    if !config.cors_is_wildcard() {
        tracing::warn!(
            origins = ?config.cors_origins(),
            "CORS restricted to configured origins; requests without a matching Origin get no Access-Control-Allow-Origin"
        );
    }

    let app_state = web::Data::new(AppState::new(&config, pool, limiter));
    let origins = config.cors_origins();
    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors_headers(&origins))
            .wrap(cors_layer(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes::<SqlxContactRepo, ResendMailer>)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res?,
        _ = shutdown_signal() => {},
    }

    Ok(())
}

async fn connect_redis_limiter(url: &str, policy: RateLimitPolicy) -> redis::RedisResult<RedisRateLimiter> {
    let client = redis::Client::open(url)?;
    RedisRateLimiter::connect(client, policy).await
}

fn spawn_memory_limiter(config: &AppConfig, policy: RateLimitPolicy) -> Arc<dyn RateLimitStore> {
    let limiter = InMemoryRateLimiter::new(policy);
    tokio::spawn(start_rate_limit_sweep(limiter.clone(), config.rate_limit_sweep_interval()));
    Arc::new(limiter)
}
