use std::env;

use anyhow::Context;

use crate::models::Schedule;
use crate::services::DEFAULT_STORAGE_KEY;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub storage_key: String,
    pub schedule: Schedule,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let schedule = match env::var("SCHEDULE_JSON") {
            Ok(json) if !json.trim().is_empty() => {
                Schedule::from_json(&json).context("invalid SCHEDULE_JSON")?
            }
            _ => Schedule::default(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "slotbook.db".to_string()),
            storage_key: env::var("STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string()),
            schedule,
        })
    }
}
