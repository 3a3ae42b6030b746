pub mod booking;
pub mod hhmm;
pub mod schedule;
pub mod wizard;

pub use booking::{Booking, BookingStatus, CustomerDetails};
pub use schedule::{DayHours, OperatingWindow, Schedule, SlotBoundary};
pub use wizard::{WizardSession, WizardStep};
