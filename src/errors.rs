use chrono::{NaiveDate, NaiveTime};

use crate::models::{BookingStatus, WizardStep};

pub type Result<T> = std::result::Result<T, BookingError>;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("slot {date} {} is no longer available", .time.format("%H:%M"))]
    Conflict { date: NaiveDate, time: NaiveTime },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("cannot {action} while {}", .from.as_str())]
    Transition { from: WizardStep, action: &'static str },

    #[error("booking {id} cannot move from {} to {}", .from.as_str(), .to.as_str())]
    InvalidStatus {
        id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BookingError {
    /// Validation and conflict errors are user-facing; the caller should let
    /// the user fix the form or pick another slot.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BookingError::Validation(_) | BookingError::Conflict { .. }
        )
    }
}
