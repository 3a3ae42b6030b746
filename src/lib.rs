pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;

pub use errors::{BookingError, Result};
