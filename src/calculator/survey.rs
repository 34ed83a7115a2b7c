//! Survey Record
//! 
//! The structured lifestyle answers a calculation runs on. A record is built
//! fresh from form state for every submission and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Usual way of getting to school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Walk,
    Bicycle,
    Bus,
    Car,
    Motorcycle,
    Other,
}

impl TransportMode {
    pub const ALL: [TransportMode; 6] = [
        TransportMode::Walk,
        TransportMode::Bicycle,
        TransportMode::Bus,
        TransportMode::Car,
        TransportMode::Motorcycle,
        TransportMode::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walk => "Walk",
            TransportMode::Bicycle => "Bicycle",
            TransportMode::Bus => "Bus",
            TransportMode::Car => "Car",
            TransportMode::Motorcycle => "Motorcycle",
            TransportMode::Other => "Other",
        }
    }

    /// Human-powered modes carry no emissions regardless of distance.
    pub fn is_zero_emission(&self) -> bool {
        matches!(self, TransportMode::Walk | TransportMode::Bicycle)
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TransportMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown transport mode '{}'", wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSection {
    pub mode: TransportMode,
    /// One-way distance to school in km
    pub distance_km: f64,
    /// In [0, 7]
    pub days_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricitySection {
    pub bulbs_daily: f64,
    pub leaves_on_when_unneeded: bool,
    pub uses_efficient_bulbs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSection {
    pub meat_meals_per_week: f64,
    pub prefers_local_seasonal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasteSection {
    pub segregates: bool,
    pub plastic_bottles_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub transport: TransportSection,
    pub electricity: ElectricitySection,
    pub food: FoodSection,
    pub waste: WasteSection,
    /// Planted a tree or joined an environmental event recently.
    /// Only feeds the tip prompt; it never changes the numbers.
    pub awareness: bool,
}

/// Form defaults shown before the user touches anything.
impl Default for SurveyRecord {
    fn default() -> Self {
        Self {
            transport: TransportSection {
                mode: TransportMode::Walk,
                distance_km: 0.0,
                days_per_week: 5.0,
            },
            electricity: ElectricitySection {
                bulbs_daily: 5.0,
                leaves_on_when_unneeded: false,
                uses_efficient_bulbs: false,
            },
            food: FoodSection {
                meat_meals_per_week: 3.0,
                prefers_local_seasonal: false,
            },
            waste: WasteSection {
                segregates: false,
                plastic_bottles_per_week: 5.0,
            },
            awareness: false,
        }
    }
}
