use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use sysinfo::System;

use crate::{
    constants::{APP_VERSION, START_TIME},
    entities::envelope::ApiResponse,
    handlers::home::uptime,
    repositories::user::UserRepository,
    use_cases::extractors::AdminClaims,
    AppState,
};

const CACHE_SECONDS: i64 = 5;

#[derive(Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    version: String,
    memory_usage: String,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> =
    Lazy::new(|| RwLock::new(HealthCheckResponse::default()));

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let database = match state.admin_handler.user_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            "Unavailable"
        }
    };

    let memory_usage = sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map_or("Unknown".to_string(), |p| {
            format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
        });

    HealthCheckResponse {
        status: if database == "OK" { "healthy" } else { "degraded" }.to_string(),
        uptime: uptime(),
        timestamp: Utc::now().to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database: database.to_string(),
        version: APP_VERSION.to_string(),
        memory_usage,
        system: system_info,
    }
}

pub async fn admin_health_check(_claims: AdminClaims, state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > CACHE_SECONDS {
        let response = build_health_response(&state).await;
        *CACHED_STATUS.write() = response.clone();
        LAST_CHECK.store(now, Ordering::Relaxed);
        return HttpResponse::Ok().json(ApiResponse::ok(response));
    }

    let cached = CACHED_STATUS.read().clone();
    HttpResponse::Ok().json(ApiResponse::ok(cached))
}
