use chrono::{NaiveDate, NaiveTime};

use crate::db::KeyValueStore;
use crate::errors::{BookingError, Result};
use crate::models::{hhmm, CustomerDetails, WizardSession, WizardStep};
use crate::services::repository::BookingRepository;
use crate::services::slots::is_valid_slot;

// Each transition takes the current session and returns the next one. On
// error the caller keeps the session it passed in.

fn disallowed(session: &WizardSession, action: &'static str) -> BookingError {
    tracing::warn!(step = session.step.as_str(), action, "invalid wizard transition");
    BookingError::Transition {
        from: session.step,
        action,
    }
}

/// Picks a date. Any previously chosen time is dropped since availability
/// depends on the date.
pub fn select_date(session: &WizardSession, date: NaiveDate) -> Result<WizardSession> {
    match session.step {
        WizardStep::SelectingDate | WizardStep::SelectingTime => Ok(WizardSession {
            step: WizardStep::SelectingTime,
            date: Some(date),
            time: None,
            booking_id: None,
        }),
        _ => Err(disallowed(session, "select a date")),
    }
}

pub fn select_time<S: KeyValueStore>(
    session: &WizardSession,
    time: NaiveTime,
    repo: &BookingRepository<S>,
) -> Result<WizardSession> {
    if session.step != WizardStep::SelectingTime {
        return Err(disallowed(session, "select a time"));
    }
    let Some(date) = session.date else {
        return Err(disallowed(session, "select a time"));
    };

    ensure_free(date, time, repo)?;

    Ok(WizardSession {
        time: Some(time),
        ..session.clone()
    })
}

/// Slots the user can currently pick from for the selected date.
pub fn available_slots<S: KeyValueStore>(
    session: &WizardSession,
    repo: &BookingRepository<S>,
) -> Result<Vec<NaiveTime>> {
    repo.available_slots(session.date)
}

/// Moves on to the details form. Availability is checked again here since
/// another session may have taken the slot after it was picked.
pub fn proceed_to_details<S: KeyValueStore>(
    session: &WizardSession,
    repo: &BookingRepository<S>,
) -> Result<WizardSession> {
    if session.step != WizardStep::SelectingTime {
        return Err(disallowed(session, "continue to details"));
    }
    let (Some(date), Some(time)) = (session.date, session.time) else {
        return Err(BookingError::Validation(
            "select a date and time first".to_string(),
        ));
    };

    ensure_free(date, time, repo)?;

    Ok(WizardSession {
        step: WizardStep::EnteringDetails,
        ..session.clone()
    })
}

/// Back from the details form, keeping the date and time.
pub fn back_to_time(session: &WizardSession) -> Result<WizardSession> {
    if session.step != WizardStep::EnteringDetails {
        return Err(disallowed(session, "go back"));
    }
    Ok(WizardSession {
        step: WizardStep::SelectingTime,
        ..session.clone()
    })
}

/// Creates the booking. A conflict leaves the user on the details step;
/// they need to go back and pick another slot.
pub fn submit<S: KeyValueStore>(
    session: &WizardSession,
    details: CustomerDetails,
    repo: &BookingRepository<S>,
) -> Result<WizardSession> {
    if session.step != WizardStep::EnteringDetails {
        return Err(disallowed(session, "submit"));
    }
    let (Some(date), Some(time)) = (session.date, session.time) else {
        return Err(disallowed(session, "submit"));
    };

    let id = repo.append(date, time, details)?;

    Ok(WizardSession {
        step: WizardStep::Confirmed,
        booking_id: Some(id),
        ..session.clone()
    })
}

/// Starts a new booking attempt after a confirmation.
pub fn reset(session: &WizardSession) -> Result<WizardSession> {
    if session.step != WizardStep::Confirmed {
        return Err(disallowed(session, "start over"));
    }
    Ok(WizardSession::new())
}

fn ensure_free<S: KeyValueStore>(
    date: NaiveDate,
    time: NaiveTime,
    repo: &BookingRepository<S>,
) -> Result<()> {
    if !is_valid_slot(date, time, repo.schedule()) {
        return Err(BookingError::Validation(format!(
            "{} is not a bookable slot on {date}",
            hhmm::format(&time)
        )));
    }
    if !repo.is_available(date, time)? {
        return Err(BookingError::Conflict { date, time });
    }
    Ok(())
}
