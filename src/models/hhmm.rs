//! `HH:MM` serde format for [`NaiveTime`]. Seconds are accepted on read so
//! blobs written by other tools still load.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

pub fn format(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| anyhow::anyhow!("invalid time format: {s}"))
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}
