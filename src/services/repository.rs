use std::collections::HashSet;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::db::KeyValueStore;
use crate::errors::{BookingError, Result};
use crate::models::{hhmm, Booking, BookingStatus, CustomerDetails, Schedule};
use crate::services::availability::{self, is_slot_taken};
use crate::services::ids;
use crate::services::slots::is_valid_slot;

pub const DEFAULT_STORAGE_KEY: &str = "bookings";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
}

impl BookingFilter {
    fn matches(&self, booking: &Booking) -> bool {
        self.status.map_or(true, |s| booking.status == s)
            && self.date.map_or(true, |d| booking.date == d)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BookingStats {
    pub total: usize,
    pub confirmed: usize,
    pub today: usize,
    pub completed: usize,
}

/// The booking collection, stored as one JSON array under a single key.
///
/// Every operation reads the blob fresh and every mutation rewrites it
/// whole, so sessions sharing a store see each other's writes. A failed
/// operation never writes.
pub struct BookingRepository<S: KeyValueStore> {
    store: S,
    key: String,
    schedule: Schedule,
}

impl<S: KeyValueStore> BookingRepository<S> {
    pub fn new(store: S, schedule: Schedule) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY, schedule)
    }

    pub fn with_key(store: S, key: &str, schedule: Schedule) -> Self {
        Self {
            store,
            key: key.to_string(),
            schedule,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load(&self) -> Result<Vec<Booking>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let bookings: Vec<Booking> = serde_json::from_str(&raw)
            .with_context(|| format!("stored collection under '{}' is malformed", self.key))?;
        Ok(bookings)
    }

    fn save(&self, bookings: &[Booking]) -> Result<()> {
        let raw = serde_json::to_string(bookings)?;
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    /// Validates and stores a new confirmed booking, returning its id.
    pub fn append(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        details: CustomerDetails,
    ) -> Result<String> {
        details.validate()?;

        if !is_valid_slot(date, time, &self.schedule) {
            return Err(BookingError::Validation(format!(
                "{} is not a bookable slot on {date}",
                hhmm::format(&time)
            )));
        }

        let mut bookings = self.load()?;
        if is_slot_taken(date, time, &bookings) {
            tracing::info!(%date, time = %hhmm::format(&time), "slot already held");
            return Err(BookingError::Conflict { date, time });
        }

        let now = Utc::now();
        let id = {
            let taken: HashSet<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
            ids::next_id(now, &taken)
        };

        bookings.push(details.into_booking(id.clone(), date, time, now));
        self.save(&bookings)?;

        tracing::info!(id = %id, %date, time = %hhmm::format(&time), "booking created");
        Ok(id)
    }

    /// Moves a confirmed booking to completed or cancelled. Re-applying the
    /// current status is a no-op.
    pub fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking> {
        let mut bookings = self.load()?;
        let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
            tracing::warn!(id, status = status.as_str(), "status update for unknown booking");
            return Err(BookingError::NotFound(format!("booking {id}")));
        };

        if booking.status == status {
            tracing::debug!(id, status = status.as_str(), "status unchanged");
            return Ok(booking.clone());
        }

        if !booking.status.can_transition_to(status) {
            tracing::warn!(
                id,
                from = booking.status.as_str(),
                to = status.as_str(),
                "rejected status transition"
            );
            return Err(BookingError::InvalidStatus {
                id: id.to_string(),
                from: booking.status,
                to: status,
            });
        }

        booking.status = status;
        let updated = booking.clone();
        self.save(&bookings)?;

        tracing::info!(id, status = status.as_str(), "booking status updated");
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Result<Booking> {
        self.load()?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| BookingError::NotFound(format!("booking {id}")))
    }

    /// Bookings on `date`, earliest slot first.
    pub fn query_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .load()?
            .into_iter()
            .filter(|b| b.date == date)
            .collect();
        bookings.sort_by(|a, b| a.time.cmp(&b.time).then(a.created_at.cmp(&b.created_at)));
        Ok(bookings)
    }

    /// All bookings, most recent appointment first.
    pub fn query_all(&self) -> Result<Vec<Booking>> {
        self.query(&BookingFilter::default())
    }

    pub fn query(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .load()?
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect();
        sort_newest_first(&mut bookings);
        Ok(bookings)
    }

    pub fn available_slots(&self, date: Option<NaiveDate>) -> Result<Vec<NaiveTime>> {
        let Some(d) = date else {
            return Ok(Vec::new());
        };
        let bookings = self.query_by_date(d)?;
        Ok(availability::available_slots(date, &bookings, &self.schedule))
    }

    pub fn is_available(&self, date: NaiveDate, time: NaiveTime) -> Result<bool> {
        if !is_valid_slot(date, time, &self.schedule) {
            return Ok(false);
        }
        let bookings = self.query_by_date(date)?;
        Ok(!is_slot_taken(date, time, &bookings))
    }

    pub fn stats(&self, today: NaiveDate) -> Result<BookingStats> {
        let bookings = self.load()?;
        Ok(BookingStats {
            total: bookings.len(),
            confirmed: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Confirmed)
                .count(),
            today: bookings
                .iter()
                .filter(|b| b.date == today && b.occupies_slot())
                .count(),
            completed: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Completed)
                .count(),
        })
    }

    /// Drops the whole collection. Asking the user first is the caller's job.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        tracing::info!(key = %self.key, "booking collection cleared");
        Ok(())
    }
}

fn sort_newest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        (b.date, b.time, b.created_at).cmp(&(a.date, a.time, a.created_at))
    });
}
