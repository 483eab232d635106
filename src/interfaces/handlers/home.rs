use std::time::Duration;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde_json::json;

use crate::{
    constants::{APP_VERSION, START_TIME},
    AppState,
};

pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the Portfolio API",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment.to_string(),
        "version": APP_VERSION,
    }))
}

pub fn uptime() -> String {
    let seconds = Utc::now()
        .signed_duration_since(*START_TIME)
        .num_seconds()
        .max(0) as u64;
    format_duration(Duration::from_secs(seconds)).to_string()
}

pub async fn api_status(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "API is working correctly",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment.to_string(),
        "version": APP_VERSION,
        "uptime": uptime(),
    }))
}
