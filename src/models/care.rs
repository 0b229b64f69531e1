use serde::{Deserialize, Serialize};

/// The room a plant lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Room {
    #[serde(rename = "bedroom")]
    Bedroom,
    #[serde(rename = "livingroom")]
    LivingRoom,
    #[serde(rename = "kitchen")]
    Kitchen,
    #[serde(rename = "balcony")]
    Balcony,
    #[serde(rename = "bathroom")]
    Bathroom,
}

impl Room {
    pub const ALL: [Room; 5] = [
        Self::Bedroom,
        Self::LivingRoom,
        Self::Kitchen,
        Self::Balcony,
        Self::Bathroom,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Bedroom => "Bedroom",
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::Balcony => "Balcony",
            Self::Bathroom => "Bathroom",
        }
    }

    /// Command-line spelling, e.g. `living-room`.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::LivingRoom => "living-room",
            Self::Kitchen => "kitchen",
            Self::Balcony => "balcony",
            Self::Bathroom => "bathroom",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|room| room.slug() == s)
    }
}

/// How much light a plant gets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Light {
    FullSun,
    PartialSun,
    LowLight,
}

impl Light {
    pub const ALL: [Light; 3] = [Self::FullSun, Self::PartialSun, Self::LowLight];

    pub fn title(&self) -> &'static str {
        match self {
            Self::FullSun => "Full Sun",
            Self::PartialSun => "Partial Sun",
            Self::LowLight => "Low Light",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::FullSun => "full-sun",
            Self::PartialSun => "partial-sun",
            Self::LowLight => "low-light",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|light| light.slug() == s)
    }
}

/// How often a plant should be watered.
///
/// Each frequency maps to a fixed interval in days, which is only used to
/// decide when a reminder fires. Whether a plant counts as watered is a
/// calendar-day question and never consults the interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum WateringDays {
    EveryDay,
    Every2Days,
    Every3Days,
    OnceWeek,
    Every10Days,
    Every2Weeks,
}

impl WateringDays {
    pub const ALL: [WateringDays; 6] = [
        Self::EveryDay,
        Self::Every2Days,
        Self::Every3Days,
        Self::OnceWeek,
        Self::Every10Days,
        Self::Every2Weeks,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::EveryDay => "Every Day",
            Self::Every2Days => "Every 2 Days",
            Self::Every3Days => "Every 3 Days",
            Self::OnceWeek => "Once a Week",
            Self::Every10Days => "Every 10 days",
            Self::Every2Weeks => "Every 2 weeks",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::EveryDay => "every-day",
            Self::Every2Days => "every-2-days",
            Self::Every3Days => "every-3-days",
            Self::OnceWeek => "once-a-week",
            Self::Every10Days => "every-10-days",
            Self::Every2Weeks => "every-2-weeks",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|days| days.slug() == s)
    }

    pub fn interval_days(&self) -> u32 {
        match self {
            Self::EveryDay => 1,
            Self::Every2Days => 2,
            Self::Every3Days => 3,
            Self::OnceWeek => 7,
            Self::Every10Days => 10,
            Self::Every2Weeks => 14,
        }
    }
}

/// How much water a plant takes per watering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Water {
    #[serde(rename = "ml20to50")]
    Ml20To50,
    #[serde(rename = "ml50to100")]
    Ml50To100,
    #[serde(rename = "ml100to200")]
    Ml100To200,
    #[serde(rename = "ml200to300")]
    Ml200To300,
}

impl Water {
    pub const ALL: [Water; 4] = [
        Self::Ml20To50,
        Self::Ml50To100,
        Self::Ml100To200,
        Self::Ml200To300,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Ml20To50 => "20-50 ml",
            Self::Ml50To100 => "50-100 ml",
            Self::Ml100To200 => "100-200 ml",
            Self::Ml200To300 => "200-300 ml",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Ml20To50 => "20-50ml",
            Self::Ml50To100 => "50-100ml",
            Self::Ml100To200 => "100-200ml",
            Self::Ml200To300 => "200-300ml",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|water| water.slug() == s)
    }
}
