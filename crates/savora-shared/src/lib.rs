//! # savora-shared
//!
//! Domain types and pure decision logic for the Savora content service.
//!
//! Everything in this crate is side-effect free: the entitlement engine and
//! the streak tracker are plain functions over already-fetched data, so they
//! can be unit-tested without a database and reused by any front end.

pub mod constants;
pub mod entitlement;
pub mod overrides;
pub mod streak;
pub mod types;

pub use types::{AccessRequest, Decision, DenialReason, Plan, PlanState, Section};
