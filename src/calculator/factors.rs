//! Emission Factors
//! 
//! Per-unit conversion constants from activity quantities to kg CO2e.
//! The table is process-wide configuration: built once (defaults or config
//! override) and only ever read afterwards.

use serde::{Deserialize, Serialize};

use super::survey::TransportMode;
use crate::error::FactorError;

/// Fictional weekly average for a student, in kg CO2e.
pub const AVERAGE_FOOTPRINT_PER_WEEK: f64 = 25.0;

/// kg CO2e per km for a single one-way trip, per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportFactors {
    pub walk: f64,
    pub bicycle: f64,
    pub bus: f64,
    pub car: f64,
    pub motorcycle: f64,
    /// Average of the motorized options
    pub other: f64,
}

impl TransportFactors {
    pub fn factor(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walk => self.walk,
            TransportMode::Bicycle => self.bicycle,
            TransportMode::Bus => self.bus,
            TransportMode::Car => self.car,
            TransportMode::Motorcycle => self.motorcycle,
            TransportMode::Other => self.other,
        }
    }
}

impl Default for TransportFactors {
    fn default() -> Self {
        Self {
            walk: 0.0,
            bicycle: 0.0,
            bus: 0.04,
            car: 0.18,
            motorcycle: 0.09,
            other: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmissionFactorTable {
    pub transport: TransportFactors,
    /// Per bulb per week: 60W for 5h a day over 7 days on a 0.5 kg/kWh grid.
    pub bulb: f64,
    /// LED draw relative to incandescent. Emissions are divided by this when
    /// energy-saving bulbs are NOT in use, so it must stay in (0, 1).
    pub energy_saving_factor: f64,
    /// Multiplier (> 1) for leaving lights and fans on when not needed.
    pub inefficiency_penalty: f64,
    /// Per meat meal.
    pub meat_meal: f64,
    /// Multiplier (< 1) for preferring local/seasonal food.
    pub local_food_bonus: f64,
    /// Per plastic bottle.
    pub plastic_bottle: f64,
    /// Multiplier (< 1) for segregating waste.
    pub recycling_bonus: f64,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self {
            transport: TransportFactors::default(),
            bulb: 1.05,
            energy_saving_factor: 1.0 / 6.0,
            inefficiency_penalty: 1.1,
            meat_meal: 2.5,
            local_food_bonus: 0.9,
            plastic_bottle: 0.03,
            recycling_bonus: 0.9,
        }
    }
}

impl EmissionFactorTable {
    /// Check the directional constraints the calculator relies on.
    /// Used when a table is loaded from configuration instead of the defaults.
    pub fn check(&self) -> Result<(), FactorError> {
        let t = &self.transport;
        for (name, value) in [
            ("transport.walk", t.walk),
            ("transport.bicycle", t.bicycle),
            ("transport.bus", t.bus),
            ("transport.car", t.car),
            ("transport.motorcycle", t.motorcycle),
            ("transport.other", t.other),
            ("bulb", self.bulb),
            ("meatMeal", self.meat_meal),
            ("plasticBottle", self.plastic_bottle),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FactorError::Negative(name));
            }
        }
        for (name, value) in [
            ("energySavingFactor", self.energy_saving_factor),
            ("localFoodBonus", self.local_food_bonus),
            ("recyclingBonus", self.recycling_bonus),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(FactorError::OutsideUnitInterval(name));
            }
        }
        if !(self.inefficiency_penalty > 1.0 && self.inefficiency_penalty.is_finite()) {
            return Err(FactorError::PenaltyNotAboveOne);
        }
        Ok(())
    }
}
