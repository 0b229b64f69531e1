//! Planto: keep track of houseplants and when they were last watered.
//!
//! [`store::PlantStore`] is the single owner of the plant list. It persists
//! every change as a JSON snapshot, clears stale "watered" flags once a day
//! has passed, and asks a [`reminder::ReminderScheduler`] for a reminder
//! whenever a plant is added.

pub mod clock;
pub mod completion;
pub mod config;
mod files;
pub mod models;
pub mod reminder;
pub mod render;
pub mod store;
