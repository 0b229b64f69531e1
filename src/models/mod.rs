//! Domain models for Planto.
//!
//! - [`Plant`]: one houseplant, its care schedule and its watering state.
//! - [`Room`], [`Light`], [`WateringDays`], [`Water`]: closed sets of care
//!   attributes. Each has a display title; [`WateringDays`] also maps to the
//!   reminder interval in days.

mod care;
mod plant;

pub use care::*;
pub use plant::*;
