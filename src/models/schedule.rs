use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::hhmm;

pub const DEFAULT_SLOT_MINUTES: u32 = 90;
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;

const DAY_ORDER: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Half-open `[open, close)` range of the working day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingWindow {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

impl OperatingWindow {
    pub fn hours(open: u32, close: u32) -> Self {
        Self {
            open: NaiveTime::from_hms_opt(open, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(close, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }

    pub(crate) fn open_minutes(&self) -> u32 {
        minutes_of_day(&self.open)
    }

    pub(crate) fn close_minutes(&self) -> u32 {
        minutes_of_day(&self.close)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayHours {
    pub day: String,
    #[serde(flatten)]
    pub window: OperatingWindow,
}

/// Which slots near closing time are still offered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotBoundary {
    /// The whole slot must finish by closing time.
    #[default]
    SlotEnd,
    /// Any slot that starts before closing time is offered.
    SlotStart,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    pub default: OperatingWindow,
    #[serde(default)]
    pub days: Vec<DayHours>,
    #[serde(default)]
    pub boundary: SlotBoundary,
}

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
            default: OperatingWindow::hours(9, 21),
            days: vec![DayHours {
                day: "fri".to_string(),
                window: OperatingWindow::hours(10, 18),
            }],
            boundary: SlotBoundary::SlotEnd,
        }
    }
}

impl Schedule {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let schedule: Schedule = serde_json::from_str(s)?;
        if schedule.slot_minutes == 0 || schedule.slot_minutes > MAX_SLOT_MINUTES {
            return Err(anyhow::anyhow!(
                "slot_minutes must be between 1 and {MAX_SLOT_MINUTES}, got {}",
                schedule.slot_minutes
            ));
        }
        check_window("default", &schedule.default)?;
        for day in &schedule.days {
            parse_weekday(&day.day)?;
            check_window(&day.day, &day.window)?;
        }
        Ok(schedule)
    }

    /// Operating window for a weekday; the first matching override wins.
    pub fn window_for(&self, weekday: Weekday) -> OperatingWindow {
        self.days
            .iter()
            .find(|d| parse_weekday(&d.day).ok() == Some(weekday))
            .map(|d| d.window)
            .unwrap_or(self.default)
    }

    pub fn to_human_readable(&self) -> String {
        let mut groups: Vec<(Vec<&str>, OperatingWindow)> = Vec::new();
        for (idx, day) in DAY_ORDER.iter().copied().enumerate() {
            let window = self.window_for(weekday_from_index(idx));
            if let Some((days, w)) = groups.last_mut() {
                if *w == window {
                    days.push(day);
                    continue;
                }
            }
            groups.push((vec![day], window));
        }

        groups
            .iter()
            .map(|(days, w)| {
                let label = match days.as_slice() {
                    [only] => capitalize(only),
                    [first, .., last] => format!("{}-{}", capitalize(first), capitalize(last)),
                    [] => String::new(),
                };
                format!("{label}: {}-{}", hhmm::format(&w.open), hhmm::format(&w.close))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn minutes_of_day(t: &NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

fn check_window(label: &str, window: &OperatingWindow) -> anyhow::Result<()> {
    if window.close <= window.open {
        return Err(anyhow::anyhow!(
            "{label}: close {} must be after open {}",
            hhmm::format(&window.close),
            hhmm::format(&window.open)
        ));
    }
    Ok(())
}

fn weekday_from_index(idx: usize) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

pub fn parse_weekday(s: &str) -> anyhow::Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" => Ok(Weekday::Mon),
        "tue" => Ok(Weekday::Tue),
        "wed" => Ok(Weekday::Wed),
        "thu" => Ok(Weekday::Thu),
        "fri" => Ok(Weekday::Fri),
        "sat" => Ok(Weekday::Sat),
        "sun" => Ok(Weekday::Sun),
        _ => Err(anyhow::anyhow!("invalid weekday: {s}")),
    }
}
