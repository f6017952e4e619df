//! Onboarding — a first-run screen shown until the user acknowledges it.
//!
//! The only durable state is a boolean preference, exposed here as an
//! observable flag that the UI controller subscribes to.

pub mod flag;

pub use flag::{ONBOARDING_COMPLETED, OnboardingFlag};
