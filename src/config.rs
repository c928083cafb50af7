use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub regular_discount_percent: i32,
    pub default_duration_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            regular_discount_percent: env::var("REGULAR_DISCOUNT_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            default_duration_minutes: env::var("DEFAULT_DURATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            regular_discount_percent: 10,
            default_duration_minutes: 60,
        }
    }
}
