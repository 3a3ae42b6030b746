use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::services::BookingRepository;

pub struct AppState {
    pub config: AppConfig,
    pub bookings: BookingRepository<SqliteStore>,
}

impl AppState {
    pub fn open(config: AppConfig) -> anyhow::Result<Self> {
        let store = SqliteStore::open(&config.database_url)?;
        let bookings =
            BookingRepository::with_key(store, &config.storage_key, config.schedule.clone());
        Ok(Self { config, bookings })
    }
}
