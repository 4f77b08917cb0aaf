//! # Habitboard Core Library
//!
//! Core business logic for Habitboard, a scheduled batch job that pulls
//! per-habit completion data from the Habitify API, computes streak and
//! skip statistics over a rolling 7-day window, and pushes a compact report
//! to a TRMNL e-ink display webhook.
//!
//! ## Architecture
//!
//! - **History Engine**: a backward day-by-day walk over per-day statuses
//!   that counts the current unbroken streak, even when it predates the
//!   reporting window
//! - **Response Cache**: TTL-bounded store of raw API responses keyed by a
//!   hash of the request URL, so repeated backward lookups stay cheap
//! - **Aggregation**: per-habit histories sorted into a bounded report
//!   payload, gated by a byte-size validator before webhook delivery
//!
//! ## Key Components
//!
//! - [`HabitifyClient`] / [`CachedHabitify`]: the Habitify API surface
//! - [`compute_history`]: the streak/timeline walk for one habit
//! - [`build_report`]: the full-report assembly
//! - [`TrmnlWebhook`]: terminal delivery step

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod habitify;
pub mod history;
pub mod payload;
pub mod report;
pub mod trmnl;

pub use aggregate::build_report;
pub use cache::{CacheStore, FileCache, MemoryCache, ResponseCache};
pub use config::Config;
pub use error::{ConfigError, CoreError};
pub use habitify::{CachedHabitify, HabitService, HabitifyClient};
pub use history::compute_history;
pub use report::{DayStatus, Habit, HabitHistory, HabitSummary, Report, StatusCode};
pub use trmnl::TrmnlWebhook;
