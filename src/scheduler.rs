//! # Review Scheduling
//!
//! Computes when a tune should next be practiced from the quality of the
//! session just finished and the gap since the previous one.
//!
//! ## Interval Policy
//!
//! | Rating | Interval (days)                  |
//! |--------|----------------------------------|
//! | 4-5    | `max(1, days_since * 2)`         |
//! | 3      | `max(1, days_since * 1.5)`       |
//! | 1-2    | `1`                              |
//!
//! `days_since` is fractional and `0` for a tune that was never practiced,
//! so the first session always schedules the next review one day out.
//! Intervals are never capped.
//!
//! ## Due Selection
//! A tune is due when it has no `next_review` or its `next_review` is not
//! after `now`. Due tunes are ordered by `next_review` with never-practiced
//! tunes first.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::ReelError;
use crate::model::{QualityRating, Tune};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// New review timestamps for a tune after one practice session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewUpdate {
    pub last_practiced: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub interval_days: f64,
}

/// Fractional days between `last` and `now`, or 0 if never practiced.
pub fn days_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last {
        Some(last) => (now - last).num_milliseconds() as f64 / MILLIS_PER_DAY,
        None => 0.0,
    }
}

pub fn interval_days(days_since: f64, rating: QualityRating) -> f64 {
    match rating.get() {
        4..=5 => (days_since * 2.0).max(1.0),
        3 => (days_since * 1.5).max(1.0),
        _ => 1.0,
    }
}

/// Schedule the next review for `tune` after a session rated `rating`.
pub fn schedule(tune: &Tune, rating: QualityRating, now: DateTime<Utc>) -> ReviewUpdate {
    let elapsed = days_since(tune.last_practiced, now);
    let interval = interval_days(elapsed, rating);
    // Growth is uncapped; past the calendar's end the review date saturates
    let next_review = Duration::try_milliseconds((interval * MILLIS_PER_DAY).round() as i64)
        .and_then(|step| now.checked_add_signed(step))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    debug!(
        tune = %tune.id,
        rating = rating.get(),
        days_since = elapsed,
        interval_days = interval,
        "scheduled review"
    );

    ReviewUpdate {
        last_practiced: now,
        next_review,
        interval_days: interval,
    }
}

/// [`schedule`] for an unchecked rating.
///
/// # Errors
/// Returns [`ReelError::InvalidRating`] when `rating` is outside 1-5.
pub fn record_session(
    tune: &Tune,
    rating: u8,
    now: DateTime<Utc>,
) -> Result<ReviewUpdate, ReelError> {
    let rating = QualityRating::new(rating)?;
    Ok(schedule(tune, rating, now))
}

impl Tune {
    pub fn apply_review(&mut self, update: &ReviewUpdate) {
        self.last_practiced = Some(update.last_practiced);
        self.next_review = Some(update.next_review);
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |next| next <= now)
    }
}

/// All due tunes, earliest `next_review` first.
pub fn due_tunes(tunes: &[Tune], now: DateTime<Utc>) -> Vec<&Tune> {
    let mut due: Vec<&Tune> = tunes.iter().filter(|t| t.is_due(now)).collect();
    // Option orders None before Some, so unpracticed tunes lead
    due.sort_by_key(|t| t.next_review);
    due
}

/// The tune to practice next, if any is due.
pub fn next_due(tunes: &[Tune], now: DateTime<Utc>) -> Option<&Tune> {
    tunes
        .iter()
        .filter(|t| t.is_due(now))
        .min_by_key(|t| t.next_review)
}
