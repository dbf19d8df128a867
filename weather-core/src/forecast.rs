//! Picks the handful of upcoming hours shown in the forecast strip.

use crate::model::{ForecastDay, HourSample};

/// Maximum number of columns in the forecast strip.
pub const MAX_FORECAST_HOURS: usize = 7;

/// A run of the same condition code shows one hour out of every three.
const REPEATS_SKIPPED: u32 = 2;

/// Tracks the last kept condition code and how many repeats of it were skipped.
#[derive(Debug, Default)]
struct RunTracker {
    code: u32,
    repeats: u32,
}

impl RunTracker {
    fn keep(&mut self, code: u32) -> bool {
        if code == self.code {
            if self.repeats < REPEATS_SKIPPED {
                self.repeats += 1;
                return false;
            }
            self.repeats = 0;
        }
        self.code = code;
        true
    }
}

/// Select up to [`MAX_FORECAST_HOURS`] hours strictly after `current_epoch`,
/// collapsing runs of identical condition codes.
///
/// The repeat counter is only reset when a repeated code is kept; a change of
/// code updates the tracked code and leaves the counter alone.
pub fn select_hours(today: &ForecastDay, current_epoch: i64) -> Vec<&HourSample> {
    let mut run = RunTracker::default();

    today
        .hour
        .iter()
        .filter(|h| h.time_epoch > current_epoch)
        .filter(|h| run.keep(h.condition.code))
        .take(MAX_FORECAST_HOURS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, day, hour};

    const T0: i64 = 1_700_000_000;

    fn epochs(selected: &[&HourSample]) -> Vec<i64> {
        selected.iter().map(|h| h.time_epoch).collect()
    }

    #[test]
    fn drops_hours_at_or_before_now() {
        let hours = (0..12).map(|i| hour(T0 + i * 3600, 10.0, 1000 + i as u32)).collect();
        let today = day(hours);
        let now = T0 + 2 * 3600;

        let selected = select_hours(&today, now);

        assert!(!selected.is_empty());
        assert!(selected.iter().all(|h| h.time_epoch > now));
        assert_eq!(selected[0].time_epoch, T0 + 3 * 3600);
    }

    #[test]
    fn collapses_runs_of_the_same_code() {
        let hours = (0..5).map(|i| hour(T0 + i * 3600, 10.0, 1183)).collect();
        let today = day(hours);

        let selected = select_hours(&today, T0 - 1);

        // kept, skipped, skipped, kept (counter reset), skipped
        assert_eq!(epochs(&selected), vec![T0, T0 + 3 * 3600]);
    }

    #[test]
    fn code_change_keeps_sample_without_resetting_counter() {
        let codes = [1000, 1000, 1000, 1003, 1003, 1003];
        let hours = codes.iter().enumerate().map(|(i, &c)| hour(T0 + i as i64 * 3600, 10.0, c)).collect();
        let today = day(hours);

        let selected = select_hours(&today, T0 - 1);

        // 1003 arrives with the counter at 2, so its first repeat is kept too.
        let kept: Vec<i64> = epochs(&selected).iter().map(|t| (t - T0) / 3600).collect();
        assert_eq!(kept, vec![0, 3, 4]);
    }

    #[test]
    fn first_sample_with_code_zero_is_treated_as_a_repeat() {
        let hours = vec![hour(T0, 10.0, 0), hour(T0 + 3600, 10.0, 1000)];
        let today = day(hours);

        let selected = select_hours(&today, T0 - 1);

        assert_eq!(epochs(&selected), vec![T0 + 3600]);
    }

    #[test]
    fn output_is_capped() {
        let hours = (0..20).map(|i| hour(T0 + i * 3600, 10.0, 1000 + i as u32)).collect();
        let today = day(hours);

        let selected = select_hours(&today, T0 - 1);

        assert_eq!(selected.len(), MAX_FORECAST_HOURS);
        assert_eq!(selected.last().unwrap().time_epoch, T0 + 6 * 3600);
    }

    #[test]
    fn nothing_left_after_end_of_day() {
        let hours = (0..3).map(|i| hour(T0 + i * 3600, 10.0, 1000)).collect();
        assert!(select_hours(&day(hours), T0 + 3 * 3600).is_empty());
    }

    #[test]
    fn paris_fixture_selection() {
        let record = fixtures::paris();
        let selected = select_hours(record.today().unwrap(), record.current.last_updated_epoch);

        let local_hours: Vec<i64> =
            epochs(&selected).iter().map(|t| (t - fixtures::PARIS_MIDNIGHT) / 3600).collect();
        assert_eq!(local_hours, vec![15, 18, 19, 20, 23]);
    }
}
