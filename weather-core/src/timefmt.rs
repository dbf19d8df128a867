//! Local date/time labels for the card.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::Clock;

/// Resolve an IANA zone id, falling back to UTC for ids chrono-tz doesn't know.
pub fn resolve_tz(tz_id: &str) -> Tz {
    tz_id.parse().unwrap_or_else(|_| {
        tracing::warn!(tz_id, "Unknown time zone, formatting in UTC");
        Tz::UTC
    })
}

fn local_time(epoch: i64, tz: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default().with_timezone(&tz)
}

/// Date shown next to the condition text, e.g. `1 Sat, 14:00` or `1 Sat, 2:00 PM`.
pub fn card_date(epoch: i64, tz: Tz, clock: Clock) -> String {
    let pattern = match clock {
        Clock::H24 => "%-d %a, %H:%M",
        Clock::H12 => "%-d %a, %-I:%M %p",
    };
    local_time(epoch, tz).format(pattern).to_string()
}

/// Column label in the forecast strip, e.g. `15:00` or `03:00 PM`.
pub fn hour_label(epoch: i64, tz: Tz, clock: Clock) -> String {
    let pattern = match clock {
        Clock::H24 => "%H:%M",
        Clock::H12 => "%I:%M %p",
    };
    local_time(epoch, tz).format(pattern).to_string()
}
