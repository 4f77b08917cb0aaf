//! History walk: streak and skip counting over a habit's past days.
//!
//! The walk starts at "today" and steps backward one calendar day at a
//! time. It always covers the full reporting window, and keeps going
//! further into the past while the streak is unbroken, so the reported
//! streak reflects the habit's true run even when it predates the window.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::error::CoreError;
use crate::habitify::{DayProgress, HabitService};
use crate::report::{DayStatus, Habit, HabitHistory, StatusCode, WINDOW_DAYS};

/// Compute streak, skip count and the 7-day timeline for one habit.
///
/// `today` is the live current instant; `window_start` is
/// `today - (WINDOW_DAYS - 1) days`. Both are threaded explicitly so the
/// walk is testable without ambient state.
pub fn compute_history(
    service: &dyn HabitService,
    habit: &Habit,
    today: DateTime<Utc>,
    window_start: DateTime<Utc>,
) -> Result<HabitHistory, CoreError> {
    let habit_start = habit.start_date.and_time(NaiveTime::MIN).and_utc();

    let mut on_streak = true;
    let mut streak: u32 = 0;
    let mut skipped: u32 = 0;
    let mut current = today;
    let mut is_today = true;
    // Newest-to-oldest in walk order; reversed before returning.
    let mut collected: Vec<DayStatus> = Vec::new();

    while on_streak || current >= window_start {
        // Closed days are evaluated at their end-of-day instant; today
        // keeps the live instant so a still-in-progress habit is judged
        // with real-time state.
        if current != today {
            is_today = false;
            current = end_of_day(current);
        }

        // The counting rules below read the raw wire string: only the
        // literal "failed"/"none" break the streak, so an unrecognized
        // future API value still advances it (the timeline maps it to the
        // `none` display code).
        let (raw_status, progress_percent, current_value) = if current >= habit_start {
            let data = service.day_status(&habit.id, current, !is_today)?;
            let mut raw = data.status;
            // A negative habit's "in progress" on a closed day is a
            // successfully avoided day.
            if habit.is_negative && raw == "in_progress" && !is_today {
                raw = "completed".to_string();
            }
            let (percent, value) = progress_values(data.progress.as_ref());
            (raw, percent, value)
        } else {
            // Before the habit existed.
            ("none".to_string(), -1.0, -1.0)
        };

        if current >= window_start {
            collected.push(DayStatus {
                date: current.date_naive(),
                status: StatusCode::from_raw(&raw_status),
                progress_percent,
                current_value,
            });
        }

        match raw_status.as_str() {
            "failed" | "none" => on_streak = false,
            "skipped" => {
                if on_streak {
                    skipped += 1;
                }
            }
            // Today's partial progress neither breaks nor advances the
            // streak.
            "in_progress" if is_today => {}
            _ => {
                if on_streak {
                    streak += 1;
                }
            }
        }

        current -= Duration::days(1);
    }

    let skipped_percentage = if streak == 0 {
        0.0
    } else {
        short_round(f64::from(skipped) / f64::from(streak) * 100.0)
    };

    collected.reverse();
    collected.truncate(WINDOW_DAYS as usize);

    Ok(HabitHistory {
        streak,
        skipped,
        skipped_percentage,
        statuses: collected,
    })
}

/// Last representable instant of the day `instant` falls on.
fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = instant.date_naive().and_time(NaiveTime::MIN).and_utc();
    midnight + Duration::days(1) - Duration::microseconds(1)
}

/// Rounding rule for the skip percentage: exact zero stays `0`, values
/// above `1` round to an integer, anything else keeps one decimal place.
pub fn short_round(number: f64) -> f64 {
    if number == 0.0 {
        0.0
    } else if number > 1.0 {
        number.round()
    } else {
        round1(number)
    }
}

/// Round to one decimal place.
pub fn round1(number: f64) -> f64 {
    (number * 10.0).round() / 10.0
}

fn progress_values(progress: Option<&DayProgress>) -> (f64, f64) {
    match progress {
        None => (-1.0, -1.0),
        Some(p) => match p.target_value {
            Some(target) if target != 0.0 => (
                round1(p.current_value / target * 100.0),
                round1(p.current_value),
            ),
            _ => (-1.0, round1(p.current_value)),
        },
    }
}
