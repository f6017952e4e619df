//! Course Explorer — a one-time onboarding screen backed by a persisted
//! preference, followed by a static course catalogue.

pub mod config;
pub mod courses;
pub mod error;
pub mod onboarding;
pub mod store;
pub mod ui;
