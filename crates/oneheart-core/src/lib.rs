//! Reward rules, Worldwalker rules, and the service layer for the `OneHeart`
//! impact backend.
//!
//! The rule modules are pure functions over typed inputs. The [`services`]
//! module composes them with the Ledger Store and is the only place that
//! reads or writes persistent state.
//!
//! # Modules
//!
//! - [`level`] -- XP thresholds and level resolution.
//! - [`reward`] -- Impact Calculator: XP, tokens, and impact credits for a
//!   quest completion.
//! - [`readiness`] -- Five-category readiness assessment.
//! - [`skills`] -- Skill Profiler: six skill dimensions, gaps, and roles.
//! - [`phase`] -- Phase thresholds, advancement bonuses, and the catalog.
//! - [`expedition`] -- Expedition parameters and team selection.
//! - [`mission`] -- Global mission timelines and completion math.
//! - [`services`] -- Impact, token, and Worldwalker services.
//! - [`config`] -- Configuration loading from `oneheart-config.yaml`.
//! - [`seed`] -- Demo roster for local development.

pub mod config;
pub mod expedition;
pub mod level;
pub mod mission;
pub mod phase;
pub mod readiness;
pub mod reward;
pub mod seed;
pub mod services;
pub mod skills;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ServiceConfig, StoreBackend};
pub use services::ServiceError;
