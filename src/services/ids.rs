use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

pub const ID_PREFIX: &str = "HC";

/// Last numeric id part handed out anywhere in this process.
static LAST_ISSUED: AtomicI64 = AtomicI64::new(i64::MIN);

/// Next `HC` + base-36 epoch-millisecond id for a booking created at `now`,
/// skipping anything in `taken`. The numeric part strictly increases across
/// every repository in the process, so two bookings in the same millisecond
/// still get distinct ids.
pub fn next_id(now: DateTime<Utc>, taken: &HashSet<&str>) -> String {
    let mut n = reserve(now.timestamp_millis().max(0));
    let mut id = format_id(n);
    while taken.contains(id.as_str()) {
        n = reserve(n + 1);
        id = format_id(n);
    }
    id
}

/// Claims the smallest value that is at least `candidate` and above every
/// value claimed before.
fn reserve(candidate: i64) -> i64 {
    let mut current = LAST_ISSUED.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(current.saturating_add(1));
        match LAST_ISSUED.compare_exchange_weak(
            current,
            next,
            Ordering::SeqCst,
            Ordering::Relaxed,
        ) {
            Ok(_) => return next,
            Err(actual) => current = actual,
        }
    }
}

fn format_id(n: i64) -> String {
    format!("{ID_PREFIX}{}", to_base36(n as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_717_243_200_000), "LWW29HC0");
    }

    fn numeric(id: &str) -> u64 {
        u64::from_str_radix(id.strip_prefix(ID_PREFIX).unwrap(), 36).unwrap()
    }

    #[test]
    fn test_same_millisecond_ids_differ() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = next_id(now, &HashSet::new());
        let b = next_id(now, &HashSet::new());
        assert!(a.starts_with("HC"));
        assert_ne!(a, b);
        assert!(numeric(&b) > numeric(&a));
    }

    #[test]
    fn test_skips_ids_already_stored() {
        let now = Utc::now();
        let upcoming = next_id(now, &HashSet::new());
        let following = format_id(numeric(&upcoming) as i64 + 1);
        let taken: HashSet<&str> = [following.as_str()].into_iter().collect();

        let id = next_id(now, &taken);
        assert_ne!(id, following);
        assert!(numeric(&id) > numeric(&upcoming));
    }

    #[test]
    fn test_clock_going_backwards() {
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 1).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = next_id(later, &HashSet::new());
        let b = next_id(earlier, &HashSet::new());
        assert!(numeric(&b) > numeric(&a));
    }

    #[test]
    fn test_reserve_never_repeats() {
        let first = reserve(0);
        let second = reserve(0);
        assert!(second > first);
    }
}
