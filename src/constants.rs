use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Forced in `main` so uptime counts from boot, not from the first request.
pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);
