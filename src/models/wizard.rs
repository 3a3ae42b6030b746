use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    SelectingDate,
    SelectingTime,
    EnteringDetails,
    Confirmed,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::SelectingDate => "selecting_date",
            WizardStep::SelectingTime => "selecting_time",
            WizardStep::EnteringDetails => "entering_details",
            WizardStep::Confirmed => "confirmed",
        }
    }

    /// The step number shown to the user. Date and time are picked on the
    /// same screen.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectingDate | WizardStep::SelectingTime => 1,
            WizardStep::EnteringDetails => 2,
            WizardStep::Confirmed => 3,
        }
    }
}

/// State of one booking attempt. Transitions live in
/// [`crate::services::wizard`] and return a new session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WizardSession {
    pub(crate) step: WizardStep,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) time: Option<NaiveTime>,
    pub(crate) booking_id: Option<String>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    /// Id of the booking created by this session, once confirmed.
    pub fn booking_id(&self) -> Option<&str> {
        self.booking_id.as_deref()
    }
}
