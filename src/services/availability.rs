use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Booking, Schedule};
use crate::services::slots::generate_slots;

/// Generated slots for `date` that no non-cancelled booking holds. An
/// unselected date has no slots.
pub fn available_slots(
    date: Option<NaiveDate>,
    bookings: &[Booking],
    schedule: &Schedule,
) -> Vec<NaiveTime> {
    let Some(date) = date else {
        return Vec::new();
    };

    let taken = booked_times(date, bookings);
    generate_slots(date, schedule)
        .into_iter()
        .filter(|slot| !taken.contains(slot))
        .collect()
}

pub fn booked_times(date: NaiveDate, bookings: &[Booking]) -> HashSet<NaiveTime> {
    bookings
        .iter()
        .filter(|b| b.date == date && b.occupies_slot())
        .map(|b| b.time)
        .collect()
}

pub fn is_slot_taken(date: NaiveDate, time: NaiveTime, bookings: &[Booking]) -> bool {
    bookings
        .iter()
        .any(|b| b.date == date && b.time == time && b.occupies_slot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{hhmm, BookingStatus};
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn booking(id: &str, d: &str, t: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            date: date(d),
            time: hhmm::parse(t).unwrap(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "1 Main St".to_string(),
            service: "Haircut".to_string(),
            notes: String::new(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unselected_date_is_empty() {
        assert!(available_slots(None, &[], &Schedule::default()).is_empty());
    }

    #[test]
    fn test_no_bookings_returns_all_slots() {
        let schedule = Schedule::default();
        let d = date("2024-06-10");
        assert_eq!(
            available_slots(Some(d), &[], &schedule),
            generate_slots(d, &schedule)
        );
    }

    #[test]
    fn test_removes_held_slots_only_on_same_date() {
        let bookings = vec![
            booking("HC1", "2024-06-10", "09:00", BookingStatus::Confirmed),
            booking("HC2", "2024-06-10", "12:00", BookingStatus::Completed),
            booking("HC3", "2024-06-11", "10:30", BookingStatus::Confirmed),
        ];
        let slots = available_slots(Some(date("2024-06-10")), &bookings, &Schedule::default());
        let formatted: Vec<String> = slots.iter().map(hhmm::format).collect();
        assert_eq!(
            formatted,
            vec!["10:30", "13:30", "15:00", "16:30", "18:00", "19:30"]
        );
    }

    #[test]
    fn test_cancelled_booking_frees_slot() {
        let bookings = vec![booking("HC1", "2024-06-10", "09:00", BookingStatus::Cancelled)];
        let slots = available_slots(Some(date("2024-06-10")), &bookings, &Schedule::default());
        assert_eq!(hhmm::format(&slots[0]), "09:00");
        assert!(!is_slot_taken(date("2024-06-10"), slots[0], &bookings));
    }

    #[test]
    fn test_result_is_subset_of_generated() {
        let schedule = Schedule::default();
        // an off-grid booking time cannot add anything to the result
        let bookings = vec![booking("HC1", "2024-06-07", "09:15", BookingStatus::Confirmed)];
        let d = date("2024-06-07");
        let generated = generate_slots(d, &schedule);
        let available = available_slots(Some(d), &bookings, &schedule);
        assert_eq!(available, generated);
    }

    #[test]
    fn test_fully_booked_day_is_empty() {
        let schedule = Schedule::default();
        let d = date("2024-06-07");
        let bookings: Vec<Booking> = generate_slots(d, &schedule)
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let id = format!("HC{i}");
                booking(&id, "2024-06-07", &hhmm::format(t), BookingStatus::Confirmed)
            })
            .collect();
        assert!(available_slots(Some(d), &bookings, &schedule).is_empty());
    }
}
