//! Consecutive-day engagement streaks.

use chrono::{DateTime, Utc};

/// New streak values to persist after a qualifying activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_streak_update: DateTime<Utc>,
}

/// Recompute the streak for a qualifying activity happening at `now`.
///
/// Returns `None` when the streak was already updated today (UTC calendar
/// day); the caller skips the profile write in that case, which makes the
/// operation idempotent within a day. The streak grows by one on consecutive
/// days and resets to 1 after a gap.
pub fn update_streak(
    current: u32,
    last_update: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<StreakUpdate> {
    let updated = |streak| {
        Some(StreakUpdate {
            streak,
            last_streak_update: now,
        })
    };

    let Some(last) = last_update else {
        return updated(1);
    };

    match (now.date_naive() - last.date_naive()).num_days() {
        0 => None,
        1 => updated(current.saturating_add(1)),
        // A gap of more than a day resets the run; so does a last-update
        // timestamp in the future (clock adjustment).
        _ => updated(1),
    }
}
