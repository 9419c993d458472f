use actix_web::{web, HttpResponse};
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
    dns::mx::MailDomainVerifier,
    repositories::{contact_message::ContactMessageRepository, service_request::ServiceRequestRepository},
    AppState,
};

const CACHE_TTL_SECS: i64 = 5;

#[derive(Serialize, Clone, Default)]
pub struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    version: String,
    memory_usage: String,
    tracked_ips: usize,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response<C, S, M>(state: &AppState<C, S, M>) -> HealthCheckResponse
where
    C: ContactMessageRepository,
    S: ServiceRequestRepository,
    M: MailDomainVerifier + ?Sized,
{
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let (status, db_status) = match state.contact_handler.contact_repo.check_connection().await {
        Ok(_) => ("healthy", "OK"),
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            ("degraded", "Unavailable")
        }
    };

    let mut sys = System::new_all();
    sys.refresh_all();
    let process = sysinfo::get_current_pid().ok().and_then(|pid| sys.process(pid));
    let memory_usage = process.map_or("Unknown".to_string(), |p|
        format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
    );

    HealthCheckResponse {
        status: status.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database: db_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        memory_usage,
        tracked_ips: state.contact_handler.guard.ip_limiter().tracked_keys(),
    }
}

/// Health report, rebuilt at most every few seconds.
pub async fn health_check<C, S, M>(state: web::Data<AppState<C, S, M>>) -> HttpResponse
where
    C: ContactMessageRepository + 'static,
    S: ServiceRequestRepository + 'static,
    M: MailDomainVerifier + ?Sized + 'static,
{
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > CACHE_TTL_SECS {
        let response = build_health_response(&state).await;

        if let Ok(mut cache) = CACHED_STATUS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        return HttpResponse::Ok().json(response);
    }

    let cached = CACHED_STATUS.read()
        .map(|response| response.clone())
        .map_err(|e| e.to_string());
    match cached {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::warn!("HealthCheck cache lock poisoned: {}", e);
            let response = build_health_response(&state).await;
            HttpResponse::Ok().json(response)
        }
    }
}
