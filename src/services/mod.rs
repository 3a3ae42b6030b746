pub mod availability;
pub mod ids;
pub mod repository;
pub mod slots;
pub mod wizard;

pub use repository::{BookingFilter, BookingRepository, BookingStats, DEFAULT_STORAGE_KEY};
