use actix_web::{web, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use std::{
    time::Duration,
    sync::{atomic::{AtomicI64, Ordering}, RwLock},
};
use sysinfo::System;
use serde::Serialize;

use crate::{
    constants::START_TIME,
    repositories::{contact::ContactRepository, mailer::EmailSender},
    AppState,
};

const CACHE_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
struct RateLimitStatus {
    backend: String,
    status: String,
}

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    rate_limit: RateLimitStatus,
    version: String,
    memory_usage: String,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response<R, E>(state: &AppState<R, E>) -> HealthCheckResponse
where
    R: ContactRepository,
    E: EmailSender,
{
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0);
    let human_uptime = format_duration(Duration::from_secs(uptime_secs as u64));

    let handler = &state.contact_handler;

    let database = match handler.contact_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unavailable");
            "Unavailable"
        }
    };

    let rate_limit = RateLimitStatus {
        backend: handler.limiter.backend().to_string(),
        status: if handler.limiter.is_healthy().await { "OK" } else { "Unavailable" }.to_string(),
    };

    let mut sys = System::new();
    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| {
            sys.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
            sys.process(pid).map(|p| format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0))
        })
        .unwrap_or_else(|| "Unknown".to_string());

    HealthCheckResponse {
        status: "healthy".to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database: database.to_string(),
        rate_limit,
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
    }
}

/// `GET /health`. Probes are rebuilt at most once every few seconds.
pub async fn health_check<R, E>(state: web::Data<AppState<R, E>>) -> impl Responder
where
    R: ContactRepository + 'static,
    E: EmailSender + 'static,
{
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > CACHE_SECS {
        let response = build_health_response(state.get_ref()).await;

        if let Ok(mut cache) = CACHED_STATUS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        HttpResponse::Ok().json(response)
    } else {
        match CACHED_STATUS.read() {
            Ok(response) => HttpResponse::Ok().json(response.clone()),
            Err(e) => {
                tracing::warn!("HealthCheck cache lock poisoned: {}", e);
                let response = build_health_response(state.get_ref()).await;
                HttpResponse::Ok().json(response)
            }
        }
    }
}
