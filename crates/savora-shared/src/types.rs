use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Subscription plan stored on a user profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    FreeTrial,
    Essential,
    Premium,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::FreeTrial => "free_trial",
            Plan::Essential => "essential",
            Plan::Premium => "premium",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plan text that matches none of the known variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown plan: {0}")]
pub struct ParsePlanError(pub String);

impl std::str::FromStr for Plan {
    type Err = ParsePlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_trial" => Ok(Plan::FreeTrial),
            "essential" => Ok(Plan::Essential),
            "premium" => Ok(Plan::Premium),
            other => Err(ParsePlanError(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan state
// ---------------------------------------------------------------------------

/// The slice of a user profile the entitlement engine decides on.
///
/// Overrides and admin promotion are applied by the caller before the check;
/// this struct carries the *effective* values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanState {
    pub plan: Plan,
    pub is_admin: bool,
    /// Set once at provisioning for free-trial profiles, never recomputed.
    pub trial_expires_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Access requests
// ---------------------------------------------------------------------------

/// A dashboard area the UI can navigate to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Home,
    Profile,
    Settings,
    Recipes,
    Videos,
    Favorites,
    Support,
}

impl Section {
    /// Sections every signed-in user may enter regardless of plan.
    pub fn is_ungated(&self) -> bool {
        matches!(self, Section::Home | Section::Profile | Section::Settings)
    }
}

/// What the caller wants to do.
///
/// Entering a section and opening a single item are distinct requests with
/// distinct rules (an Essential subscriber may browse the video list but not
/// open an unlimited number of lessons).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessRequest {
    /// Enter a dashboard section.
    Section { section: Section },
    /// Open a single recipe.
    OpenRecipe,
    /// Open a single video lesson.
    OpenVideo { video_id: Uuid, is_premium: bool },
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Why a [`Decision`] denied access.
///
/// The serialized names are part of the client contract; the UI maps each to
/// a specific upgrade prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DenialReason {
    /// The free-trial window has lapsed.
    #[serde(rename = "expired")]
    TrialExpired,
    /// The monthly distinct-video quota is used up.
    #[serde(rename = "limit_reached")]
    LimitReached,
    /// The content or feature needs a higher plan.
    #[serde(rename = "plan_required")]
    PlanRequired,
}

/// Outcome of an entitlement check. Computed fresh per check, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    #[serde(rename = "hasAccess")]
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<DenialReason>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: DenialReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn plan_round_trip() {
        for plan in [Plan::FreeTrial, Plan::Essential, Plan::Premium] {
            assert_eq!(Plan::from_str(plan.as_str()).unwrap(), plan);
        }
        assert!(Plan::from_str("gold").is_err());
    }

    #[test]
    fn decision_wire_format() {
        let json = serde_json::to_value(Decision::allow()).unwrap();
        assert_eq!(json, serde_json::json!({ "hasAccess": true }));

        let json = serde_json::to_value(Decision::deny(DenialReason::LimitReached)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "hasAccess": false, "reason": "limit_reached" })
        );
    }

    #[test]
    fn access_request_wire_format() {
        let request: AccessRequest =
            serde_json::from_str(r#"{ "type": "section", "section": "recipes" }"#).unwrap();
        assert_eq!(
            request,
            AccessRequest::Section {
                section: Section::Recipes
            }
        );
    }

    #[test]
    fn ungated_sections() {
        assert!(Section::Home.is_ungated());
        assert!(Section::Settings.is_ungated());
        assert!(!Section::Recipes.is_ungated());
        assert!(!Section::Favorites.is_ungated());
    }
}
