//! Plan-access decisions.
//!
//! Pure functions over already-fetched data: the caller supplies the
//! subscriber's effective plan state and, when the monthly quota applies,
//! the set of videos viewed this calendar month. The engine itself never
//! reads or writes storage, which keeps every rule unit-testable.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::constants::ESSENTIAL_MONTHLY_VIDEO_LIMIT;
use crate::types::{AccessRequest, Decision, DenialReason, Plan, PlanState, Section};

/// Outcome of [`screen`]: either a final decision, or an instruction to
/// consult the monthly viewed-video set before deciding.
///
/// The split keeps the viewed-set query (the one piece of I/O in an access
/// check) out of the decision logic and lets callers skip it entirely for
/// every request that does not hit the quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    Decided(Decision),
    NeedsQuota { video_id: Uuid },
}

/// Evaluate everything that can be decided from the profile alone.
///
/// Priority order, first match wins: admins, ungated sections, then the
/// per-plan rules.
pub fn screen(state: &PlanState, request: &AccessRequest, now: DateTime<Utc>) -> Screening {
    use Screening::Decided;

    if state.is_admin {
        return Decided(Decision::allow());
    }

    if let AccessRequest::Section { section } = request {
        if section.is_ungated() {
            return Decided(Decision::allow());
        }
    }

    match state.plan {
        // The trial window unlocks everything until it lapses.
        Plan::FreeTrial => match state.trial_expires_at {
            Some(expiry) if now > expiry => Decided(Decision::deny(DenialReason::TrialExpired)),
            _ => Decided(Decision::allow()),
        },
        Plan::Premium => Decided(Decision::allow()),
        Plan::Essential => screen_essential(request),
    }
}

/// Essential unlocks the video section and support; recipes and favorites
/// stay locked, and opening a non-premium lesson is subject to the quota.
fn screen_essential(request: &AccessRequest) -> Screening {
    match request {
        AccessRequest::Section {
            section: Section::Videos | Section::Support,
        } => Screening::Decided(Decision::allow()),
        AccessRequest::OpenVideo {
            is_premium: true, ..
        } => Screening::Decided(Decision::deny(DenialReason::PlanRequired)),
        AccessRequest::OpenVideo { video_id, .. } => Screening::NeedsQuota {
            video_id: *video_id,
        },
        _ => Screening::Decided(Decision::deny(DenialReason::PlanRequired)),
    }
}

/// Apply the distinct-videos-per-month quota.
///
/// A video already counted this month always re-opens: the subscriber never
/// loses content they unlocked, regardless of how full the quota is.
pub fn quota_decision(
    video_id: Uuid,
    viewed_this_month: &HashSet<Uuid>,
    limit: usize,
) -> Decision {
    if viewed_this_month.contains(&video_id) {
        Decision::allow()
    } else if viewed_this_month.len() >= limit {
        Decision::deny(DenialReason::LimitReached)
    } else {
        Decision::allow()
    }
}

/// Full access check for callers that already hold the month's viewed set.
pub fn check_access(
    state: &PlanState,
    request: &AccessRequest,
    viewed_this_month: &HashSet<Uuid>,
    now: DateTime<Utc>,
) -> Decision {
    match screen(state, request, now) {
        Screening::Decided(decision) => decision,
        Screening::NeedsQuota { video_id } => {
            quota_decision(video_id, viewed_this_month, ESSENTIAL_MONTHLY_VIDEO_LIMIT)
        }
    }
}

/// 00:00 UTC on the first day of `now`'s month; lower bound for the
/// viewed-video quota query.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now.date_naive().with_day(1).unwrap_or_else(|| now.date_naive());
    first
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now)
}
