//! Report data model.
//!
//! All of these are created fresh on every run and never persisted. Field
//! names are spelled out in code; serde renames keep the wire form compact
//! because the whole report must fit the webhook byte budget.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::habitify::HabitRecord;

/// Number of days in the reporting window, today inclusive.
pub const WINDOW_DAYS: i64 = 7;

/// Leading glyph on a raw habit name that marks it as negative
/// (doing it less is good). Stripped for display.
pub const NEGATIVE_MARKER: char = '!';

/// Per-day habit status.
///
/// Wire codes are single letters so a full 7-day timeline stays small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// Habit checked off for the day (`completed`).
    #[serde(rename = "c")]
    Completed,
    /// Explicitly failed (`failed`). Breaks the streak.
    #[serde(rename = "f")]
    Failed,
    /// Deliberately skipped (`skipped`). Keeps the streak alive but is
    /// counted separately.
    #[serde(rename = "s")]
    Skipped,
    /// Partially done (`in_progress`).
    #[serde(rename = "p")]
    InProgress,
    /// No data: before the habit existed, or an unrecognized wire value.
    /// Display mapping only; the streak rules read the raw string, and
    /// only a literal `none` breaks the streak.
    #[serde(rename = "n")]
    None,
}

impl StatusCode {
    /// Map a raw Habitify status string. Unrecognized values become `None`.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "completed" => StatusCode::Completed,
            "failed" => StatusCode::Failed,
            "skipped" => StatusCode::Skipped,
            "in_progress" => StatusCode::InProgress,
            _ => StatusCode::None,
        }
    }
}

/// A habit as used by the history walk, derived once from the raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    /// Raw name with the negative marker stripped.
    pub display_name: String,
    pub is_negative: bool,
    /// Calendar day the habit was created; days before it have no data.
    pub start_date: NaiveDate,
}

impl Habit {
    /// Build from a raw API record, deriving negativity from the leading
    /// marker glyph and parsing the start date.
    pub fn from_record(record: &HabitRecord) -> Result<Self, CoreError> {
        let (is_negative, display_name) = match record.name.strip_prefix(NEGATIVE_MARKER) {
            Some(rest) => (true, rest.trim_start().to_string()),
            None => (false, record.name.clone()),
        };
        let start_date = parse_start_date(&record.start_date)?;
        Ok(Self {
            id: record.id.clone(),
            display_name,
            is_negative,
            start_date,
        })
    }
}

/// Habitify reports start dates as RFC 3339 instants; accept a bare
/// calendar day as well.
fn parse_start_date(raw: &str) -> Result<NaiveDate, CoreError> {
    if let Ok(instant) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| CoreError::MalformedResponse {
        context: "habit start_date".into(),
        message: format!("cannot parse '{raw}': {e}"),
    })
}

/// One day in a habit's status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatus {
    /// Calendar day, serialized as `YYYY-MM-DD` (same format as the
    /// report header).
    #[serde(rename = "d")]
    pub date: NaiveDate,
    /// Status code for the day.
    #[serde(rename = "s")]
    pub status: StatusCode,
    /// `round1(current / target * 100)` when a non-zero numeric target
    /// exists, otherwise `-1.0`.
    #[serde(rename = "p")]
    pub progress_percent: f64,
    /// `round1(current)` when progress data exists, otherwise `-1.0`.
    #[serde(rename = "v")]
    pub current_value: f64,
}

/// Result of the history walk for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitHistory {
    /// Consecutive successful days up to and including today, unbroken by
    /// `failed` or `none`. May predate the reporting window.
    pub streak: u32,
    /// Days marked `skipped` inside the unbroken run.
    pub skipped: u32,
    /// `short_round(skipped / streak * 100)`, `0` when the streak is empty.
    pub skipped_percentage: f64,
    /// Oldest-to-newest timeline, exactly [`WINDOW_DAYS`] entries.
    pub statuses: Vec<DayStatus>,
}

/// A habit joined with its computed history, as delivered in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub name: String,
    pub is_negative: bool,
    pub streak: u32,
    pub skipped: u32,
    pub skipped_percentage: f64,
    pub statuses: Vec<DayStatus>,
}

impl HabitSummary {
    pub fn new(habit: Habit, history: HabitHistory) -> Self {
        Self {
            name: habit.display_name,
            is_negative: habit.is_negative,
            streak: history.streak,
            skipped: history.skipped,
            skipped_percentage: history.skipped_percentage,
            statuses: history.statuses,
        }
    }
}

/// The full report handed to the webhook after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The 7 window days, ascending, serialized as `YYYY-MM-DD`.
    pub header: Vec<NaiveDate>,
    /// Non-negative habits first, then negative ones; ascending streak
    /// within each group.
    pub habits: Vec<HabitSummary>,
}
