//! Operator-configured plan overrides.
//!
//! Specific accounts (comped customers, test users) can be pinned to a plan
//! through configuration instead of being special-cased in code. A pinned
//! account never lapses: the caller clears the trial expiry when an override
//! applies.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{ParsePlanError, Plan};

/// Email → plan table, parsed from the `PLAN_OVERRIDES` setting.
///
/// Lookup is case-insensitive on the email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOverrides {
    entries: HashMap<String, Plan>,
}

/// Invalid `PLAN_OVERRIDES` text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseOverridesError {
    #[error("override entry `{0}` is missing `=`")]
    MissingSeparator(String),

    #[error(transparent)]
    Plan(#[from] ParsePlanError),
}

impl PlanOverrides {
    /// The pinned plan for `email`, if any.
    pub fn plan_for(&self, email: &str) -> Option<Plan> {
        self.entries.get(&normalize(email)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromStr for PlanOverrides {
    type Err = ParseOverridesError;

    /// Parse `alice@example.com=premium,bob@example.com=essential`.
    ///
    /// Empty segments are skipped so trailing commas are harmless.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut entries = HashMap::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((email, plan)) = part.split_once('=') else {
                return Err(ParseOverridesError::MissingSeparator(part.to_string()));
            };
            let plan = Plan::from_str(plan.trim())?;
            entries.insert(normalize(email), plan);
        }
        Ok(Self { entries })
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_lookup() {
        let overrides: PlanOverrides = "alice@example.com=premium, bob@example.com=essential,"
            .parse()
            .unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.plan_for("alice@example.com"), Some(Plan::Premium));
        assert_eq!(overrides.plan_for("bob@example.com"), Some(Plan::Essential));
        assert_eq!(overrides.plan_for("carol@example.com"), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let overrides: PlanOverrides = "Alice@Example.COM=premium".parse().unwrap();
        assert_eq!(overrides.plan_for("alice@example.com"), Some(Plan::Premium));
        assert_eq!(overrides.plan_for(" ALICE@EXAMPLE.COM "), Some(Plan::Premium));
    }

    #[test]
    fn empty_string_parses_to_empty_table() {
        let overrides: PlanOverrides = "".parse().unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            "alice@example.com".parse::<PlanOverrides>(),
            Err(ParseOverridesError::MissingSeparator(_))
        ));
        assert!(matches!(
            "alice@example.com=gold".parse::<PlanOverrides>(),
            Err(ParseOverridesError::Plan(_))
        ));
    }
}
