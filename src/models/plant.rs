use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::care::{Light, Room, Water, WateringDays};
use crate::clock::Calendar;

/// A tracked houseplant and its care schedule.
///
/// `is_watered` is the checklist flag for the current tracking cycle. It only
/// means "watered today" once the daily rollover has run, which clears flags
/// whose `last_watered_at` belongs to an earlier calendar day. The history in
/// `last_watered_at` survives the rollover.
///
/// Snapshot files written by older versions may omit `id` or `isWatered`;
/// those get a fresh id and `false` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub room: Room,
    pub light: Light,
    pub watering_days: WateringDays,
    pub water: Water,
    #[serde(default)]
    pub is_watered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_watered_at: Option<DateTime<Utc>>,
}

impl Plant {
    pub fn new(input: CreatePlantInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            room: input.room,
            light: input.light,
            watering_days: input.watering_days,
            water: input.water,
            is_watered: false,
            last_watered_at: None,
        }
    }

    /// Whether `last_watered_at` falls on the same local date as `now`.
    /// Each instant is dated by `calendar` on its own. Never watered is `false`.
    pub fn is_watered_today<C>(&self, now: DateTime<Utc>, calendar: &C) -> bool
    where
        C: Calendar + ?Sized,
    {
        match self.last_watered_at {
            Some(at) => calendar.date_of(at) == calendar.date_of(now),
            None => false,
        }
    }

    /// Apply a partial edit. Watering state is left alone.
    pub fn apply(&mut self, input: UpdatePlantInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(room) = input.room {
            self.room = room;
        }
        if let Some(light) = input.light {
            self.light = light;
        }
        if let Some(watering_days) = input.watering_days {
            self.watering_days = watering_days;
        }
        if let Some(water) = input.water {
            self.water = water;
        }
    }
}

/// Input for creating a new plant. The id is assigned on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlantInput {
    pub name: String,
    pub room: Room,
    pub light: Light,
    pub watering_days: WateringDays,
    pub water: Water,
}

impl CreatePlantInput {
    /// A new plant with the add-form defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room: Room::Bedroom,
            light: Light::FullSun,
            watering_days: WateringDays::EveryDay,
            water: Water::Ml20To50,
        }
    }
}

/// Input for editing an existing plant. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlantInput {
    pub name: Option<String>,
    pub room: Option<Room>,
    pub light: Option<Light>,
    pub watering_days: Option<WateringDays>,
    pub water: Option<Water>,
}

impl UpdatePlantInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.room.is_none()
            && self.light.is_none()
            && self.watering_days.is_none()
            && self.water.is_none()
    }
}

/// Plant names must contain something other than whitespace.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}
