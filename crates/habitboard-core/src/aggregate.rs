//! Report assembly: all active habits, sorted, with the date header.

use chrono::{DateTime, Duration, Utc};

use crate::error::CoreError;
use crate::habitify::HabitService;
use crate::history::compute_history;
use crate::report::{Habit, HabitSummary, Report, WINDOW_DAYS};

/// Build the full report as of `now`.
///
/// Fetches the habit list (never cached), drops archived habits, runs the
/// history walk for each remaining one and sorts the results: non-negative
/// habits before negative ones, ascending streak within each group.
pub fn build_report(service: &dyn HabitService, now: DateTime<Utc>) -> Result<Report, CoreError> {
    let window_start = now - Duration::days(WINDOW_DAYS - 1);

    let records = service.list_habits()?;
    let mut habits = Vec::new();

    for record in records {
        if record.is_archived {
            continue;
        }
        let habit = Habit::from_record(&record)?;
        log::info!("computing history for '{}'", habit.display_name);
        let history = compute_history(service, &habit, now, window_start)?;
        habits.push(HabitSummary::new(habit, history));
    }

    // Two-key sort: negativity groups first, then streak.
    habits.sort_by_key(|h| (h.is_negative, h.streak));

    let header = (0..WINDOW_DAYS)
        .map(|offset| (window_start + Duration::days(offset)).date_naive())
        .collect();

    Ok(Report { header, habits })
}
