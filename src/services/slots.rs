use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::models::{Schedule, SlotBoundary};

/// Candidate start times for `date`, earliest first. Depends only on the
/// date's weekday and the schedule, never on stored bookings.
pub fn generate_slots(date: NaiveDate, schedule: &Schedule) -> Vec<NaiveTime> {
    let window = schedule.window_for(date.weekday());
    let open = window.open_minutes();
    let close = window.close_minutes();
    let step = schedule.slot_minutes;

    let mut slots = Vec::new();
    if step == 0 {
        return slots;
    }

    let mut start = open;
    while start < close {
        let next = start.checked_add(step);
        let fits = match schedule.boundary {
            SlotBoundary::SlotEnd => next.is_some_and(|end| end <= close),
            SlotBoundary::SlotStart => true,
        };
        if !fits {
            break;
        }
        if let Some(t) = NaiveTime::from_hms_opt(start / 60, start % 60, 0) {
            slots.push(t);
        }
        let Some(next) = next else {
            break;
        };
        start = next;
    }
    slots
}

pub fn is_valid_slot(date: NaiveDate, time: NaiveTime, schedule: &Schedule) -> bool {
    generate_slots(date, schedule).contains(&time)
}
