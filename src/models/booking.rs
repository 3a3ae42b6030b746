use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, Result};
use crate::models::hhmm;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service: String,
    #[serde(default)]
    pub notes: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// True while the booking holds its slot.
    pub fn occupies_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" | "canceled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Only a confirmed booking moves, and only to a terminal state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

/// Customer details collected on the details step, before an id is assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service: String,
    #[serde(default)]
    pub notes: String,
}

impl CustomerDetails {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("service", &self.service),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BookingError::Validation(format!("{field} is required")));
            }
        }

        if !is_plausible_email(self.email.trim()) {
            return Err(BookingError::Validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }

        Ok(())
    }

    pub(crate) fn into_booking(
        self,
        id: String,
        date: NaiveDate,
        time: NaiveTime,
        created_at: DateTime<Utc>,
    ) -> Booking {
        Booking {
            id,
            date,
            time,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            service: self.service.trim().to_string(),
            notes: self.notes.trim().to_string(),
            status: BookingStatus::Confirmed,
            created_at,
        }
    }
}

fn is_plausible_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "Dana Reyes".into(),
            email: "dana@example.com".into(),
            phone: "555-0100".into(),
            address: "12 Elm St".into(),
            service: "Fade".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("Completed"), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse("canceled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("pending"), None);
    }

    #[test]
    fn test_valid_details() {
        assert!(details().validate().is_ok());
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let mut d = details();
        d.address = "   ".into();
        let err = d.validate().unwrap_err();
        assert!(matches!(err, BookingError::Validation(ref m) if m == "address is required"));
    }

    #[test]
    fn test_notes_are_optional() {
        let mut d = details();
        d.notes.clear();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_malformed_email() {
        for email in ["dana", "@example.com", "dana@", "da na@example.com", "a@b@c"] {
            let mut d = details();
            d.email = email.into();
            assert!(d.validate().is_err(), "{email} should be rejected");
        }
    }

    #[test]
    fn test_reads_widget_blob_entry() {
        let json = r#"{"id":"HCLX2K9Q1","date":"2024-06-10","time":"09:00","name":"Dana","email":"dana@example.com","phone":"555","address":"12 Elm St","service":"Fade","status":"confirmed","createdAt":"2024-06-01T12:00:00.000Z"}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(booking.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(booking.notes, "");
        assert!(booking.occupies_slot());

        let written = serde_json::to_value(&booking).unwrap();
        assert_eq!(written["time"], "09:00");
        assert_eq!(written["createdAt"], "2024-06-01T12:00:00Z");
    }
}
