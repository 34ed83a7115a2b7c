//! Input Validator
//! 
//! Turns raw form state into a `SurveyRecord` the calculator can trust.
//! All failing fields are reported together so the form can mark each one.

use serde::{Deserialize, Serialize};

use crate::calculator::{
    ElectricitySection, FoodSection, SurveyRecord, TransportMode, TransportSection, WasteSection,
};
use crate::error::{FieldError, ValidationErrors};

pub const MAX_DAYS_PER_WEEK: f64 = 7.0;

/// Raw form state. Text inputs are kept as typed and coerced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDraft {
    pub mode: String,
    pub distance_km: String,
    pub days_per_week: String,
    pub bulbs_daily: String,
    pub leaves_on_when_unneeded: bool,
    pub uses_efficient_bulbs: bool,
    pub meat_meals_per_week: String,
    pub prefers_local_seasonal: bool,
    pub segregates: bool,
    pub plastic_bottles_per_week: String,
    pub awareness: bool,
}

impl From<&SurveyRecord> for SurveyDraft {
    fn from(record: &SurveyRecord) -> Self {
        Self {
            mode: record.transport.mode.to_string(),
            distance_km: record.transport.distance_km.to_string(),
            days_per_week: record.transport.days_per_week.to_string(),
            bulbs_daily: record.electricity.bulbs_daily.to_string(),
            leaves_on_when_unneeded: record.electricity.leaves_on_when_unneeded,
            uses_efficient_bulbs: record.electricity.uses_efficient_bulbs,
            meat_meals_per_week: record.food.meat_meals_per_week.to_string(),
            prefers_local_seasonal: record.food.prefers_local_seasonal,
            segregates: record.waste.segregates,
            plastic_bottles_per_week: record.waste.plastic_bottles_per_week.to_string(),
            awareness: record.awareness,
        }
    }
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self::from(&SurveyRecord::default())
    }
}

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn number(&mut self, field: &str, raw: &str, negative_msg: &str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(v) if !v.is_finite() => {
                self.errors.push(FieldError::new(field, "Must be a finite number."));
                0.0
            }
            Ok(v) if v < 0.0 => {
                self.errors.push(FieldError::new(field, negative_msg));
                0.0
            }
            Ok(v) => v,
            Err(_) => {
                self.errors.push(FieldError::new(field, "Must be a number."));
                0.0
            }
        }
    }

    fn check(&mut self, field: &str, value: f64, negative_msg: &str) {
        if !value.is_finite() {
            self.errors.push(FieldError::new(field, "Must be a finite number."));
        } else if value < 0.0 {
            self.errors.push(FieldError::new(field, negative_msg));
        }
    }

    fn check_days(&mut self, value: f64) {
        if value > MAX_DAYS_PER_WEEK {
            self.errors.push(FieldError::new("transport.daysPerWeek", "Days cannot be more than 7."));
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

const DISTANCE_MSG: &str = "Distance cannot be negative.";
const DAYS_MSG: &str = "Days must be at least 0.";
const BULBS_MSG: &str = "Number of bulbs cannot be negative.";
const MEAT_MSG: &str = "Meat consumption cannot be negative.";
const BOTTLES_MSG: &str = "Number of bottles cannot be negative.";

/// Coerce and range-check a draft
pub fn validate(draft: &SurveyDraft) -> Result<SurveyRecord, ValidationErrors> {
    let mut c = Collector { errors: Vec::new() };

    let mode = match draft.mode.parse::<TransportMode>() {
        Ok(mode) => mode,
        Err(_) => {
            c.errors.push(FieldError::new("transport.mode", "Please select a mode of transport."));
            TransportMode::Walk
        }
    };
    let distance_km = c.number("transport.distanceKm", &draft.distance_km, DISTANCE_MSG);
    let days_per_week = c.number("transport.daysPerWeek", &draft.days_per_week, DAYS_MSG);
    c.check_days(days_per_week);
    let bulbs_daily = c.number("electricity.bulbsDaily", &draft.bulbs_daily, BULBS_MSG);
    let meat_meals_per_week = c.number("food.meatMealsPerWeek", &draft.meat_meals_per_week, MEAT_MSG);
    let plastic_bottles_per_week =
        c.number("waste.plasticBottlesPerWeek", &draft.plastic_bottles_per_week, BOTTLES_MSG);

    c.finish(SurveyRecord {
        transport: TransportSection { mode, distance_km, days_per_week },
        electricity: ElectricitySection {
            bulbs_daily,
            leaves_on_when_unneeded: draft.leaves_on_when_unneeded,
            uses_efficient_bulbs: draft.uses_efficient_bulbs,
        },
        food: FoodSection { meat_meals_per_week, prefers_local_seasonal: draft.prefers_local_seasonal },
        waste: WasteSection { segregates: draft.segregates, plastic_bottles_per_week },
        awareness: draft.awareness,
    })
}

/// Range-check an already typed record, e.g. one deserialized from JSON
pub fn validate_survey(record: &SurveyRecord) -> Result<(), ValidationErrors> {
    let mut c = Collector { errors: Vec::new() };
    c.check("transport.distanceKm", record.transport.distance_km, DISTANCE_MSG);
    c.check("transport.daysPerWeek", record.transport.days_per_week, DAYS_MSG);
    c.check_days(record.transport.days_per_week);
    c.check("electricity.bulbsDaily", record.electricity.bulbs_daily, BULBS_MSG);
    c.check("food.meatMealsPerWeek", record.food.meat_meals_per_week, MEAT_MSG);
    c.check("waste.plasticBottlesPerWeek", record.waste.plastic_bottles_per_week, BOTTLES_MSG);
    c.finish(())
}

/// A pledge needs a non-blank name and at least one tree
pub fn validate_pledge(name: &str, tree_count: u32) -> Result<(), ValidationErrors> {
    let mut c = Collector { errors: Vec::new() };
    if name.trim().is_empty() {
        c.errors.push(FieldError::new("name", "Please enter your name."));
    }
    if tree_count < 1 {
        c.errors.push(FieldError::new("treeCount", "Pledge at least one tree."));
    }
    c.finish(())
}
