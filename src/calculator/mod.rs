//! Emissions Calculator
//! 
//! Pure transform from a `SurveyRecord` and an `EmissionFactorTable` to a
//! weekly emissions estimate split by category. No I/O, no hidden state.
//!
//! Inputs are trusted: range checks belong to `crate::validation`. Values at
//! the boundaries (0 and the stated maxima) are handled like any other.

mod factors;
mod result;
mod survey;

pub use factors::{EmissionFactorTable, TransportFactors, AVERAGE_FOOTPRINT_PER_WEEK};
pub use result::{round2, CalculationResult, CategoryEmissions, Verdict};
pub use survey::{
    ElectricitySection, FoodSection, SurveyRecord, TransportMode, TransportSection, WasteSection,
};

/// Both legs of the school trip count; the form asks for one-way distance.
const ROUND_TRIP: f64 = 2.0;

/// Unrounded per-category emissions.
pub fn category_emissions(survey: &SurveyRecord, factors: &EmissionFactorTable) -> CategoryEmissions {
    let t = &survey.transport;
    let transport = t.distance_km * t.days_per_week * ROUND_TRIP * factors.transport.factor(t.mode);

    let e = &survey.electricity;
    let mut electricity = e.bulbs_daily * factors.bulb;
    if !e.uses_efficient_bulbs {
        electricity /= factors.energy_saving_factor;
    }
    if e.leaves_on_when_unneeded {
        electricity *= factors.inefficiency_penalty;
    }

    let mut food = survey.food.meat_meals_per_week * factors.meat_meal;
    if survey.food.prefers_local_seasonal {
        food *= factors.local_food_bonus;
    }

    let mut waste = survey.waste.plastic_bottles_per_week * factors.plastic_bottle;
    if survey.waste.segregates {
        waste *= factors.recycling_bonus;
    }

    CategoryEmissions { transport, electricity, food, waste }
}

/// Categories and total are rounded independently from the unrounded values,
/// so the displayed total may differ from the sum of displayed categories by
/// up to 0.02. Tips are left empty; they come from `crate::advisor`.
pub fn calculate(survey: &SurveyRecord, factors: &EmissionFactorTable) -> CalculationResult {
    let raw = category_emissions(survey, factors);
    CalculationResult {
        total_emissions: round2(raw.sum()),
        category_emissions: raw.rounded(),
        tips: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn scenario() -> SurveyRecord {
        SurveyRecord {
            transport: TransportSection { mode: TransportMode::Car, distance_km: 5.0, days_per_week: 5.0 },
            electricity: ElectricitySection {
                bulbs_daily: 5.0,
                leaves_on_when_unneeded: false,
                uses_efficient_bulbs: false,
            },
            food: FoodSection { meat_meals_per_week: 3.0, prefers_local_seasonal: false },
            waste: WasteSection { segregates: false, plastic_bottles_per_week: 5.0 },
            awareness: false,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate(&scenario(), &EmissionFactorTable::default());
        let c = result.category_emissions;
        assert!((c.transport - 9.0).abs() < EPS);
        assert!((c.electricity - 31.5).abs() < EPS);
        assert!((c.food - 7.5).abs() < EPS);
        assert!((c.waste - 0.15).abs() < EPS);
        assert!((result.total_emissions - 48.15).abs() < EPS);
        assert!(result.tips.is_empty());
    }

    // Each of the five roundings moves a value by at most half a cent, so the
    // displayed total and the sum of displayed categories can drift apart.
    #[test]
    fn test_total_tolerates_independent_rounding() {
        let factors = EmissionFactorTable::default();
        let mut survey = scenario();
        for bottles in [0.0, 1.0, 3.0, 7.0, 11.0, 17.0] {
            for meals in [0.0, 0.3, 1.7, 4.1] {
                survey.waste.plastic_bottles_per_week = bottles;
                survey.food.meat_meals_per_week = meals;
                survey.food.prefers_local_seasonal = true;
                survey.waste.segregates = true;
                let result = calculate(&survey, &factors);
                let displayed_sum = result.category_emissions.sum();
                assert!((result.total_emissions - displayed_sum).abs() <= 0.02 + EPS);
            }
        }
    }

    #[test]
    fn test_zero_emission_modes_ignore_distance() {
        let factors = EmissionFactorTable::default();
        for mode in [TransportMode::Walk, TransportMode::Bicycle] {
            let mut survey = scenario();
            survey.transport = TransportSection { mode, distance_km: 1000.0, days_per_week: 7.0 };
            assert_eq!(calculate(&survey, &factors).category_emissions.transport, 0.0);
        }
    }

    #[test]
    fn test_boundary_values() {
        let factors = EmissionFactorTable::default();
        let mut survey = scenario();
        survey.transport.days_per_week = 0.0;
        survey.electricity.bulbs_daily = 0.0;
        survey.food.meat_meals_per_week = 0.0;
        survey.waste.plastic_bottles_per_week = 0.0;
        let result = calculate(&survey, &factors);
        assert_eq!(result.total_emissions, 0.0);

        survey.transport.days_per_week = 7.0;
        let result = calculate(&survey, &factors);
        assert!((result.category_emissions.transport - 12.6).abs() < EPS);
    }

    #[test]
    fn test_awareness_has_no_effect() {
        let factors = EmissionFactorTable::default();
        let mut aware = scenario();
        aware.awareness = true;
        assert_eq!(calculate(&scenario(), &factors), calculate(&aware, &factors));
    }

    #[test]
    fn test_idempotent() {
        let factors = EmissionFactorTable::default();
        let survey = scenario();
        assert_eq!(calculate(&survey, &factors), calculate(&survey, &factors));
    }

    /// Every mode, a spread of quantities (days up to the weekly maximum) and
    /// all sixteen flag combinations.
    fn survey_grid() -> Vec<SurveyRecord> {
        let mut grid = Vec::new();
        for mode in TransportMode::ALL {
            for distance_km in [0.0, 0.5, 5.0, 42.0] {
                for days_per_week in [0.0, 1.0, 5.0, 7.0] {
                    for (bulbs, meals, bottles) in [(0.0, 0.0, 0.0), (1.0, 3.0, 5.0), (12.0, 14.0, 30.0), (2.5, 0.5, 1.0)] {
                        for flags in 0u8..16 {
                            grid.push(SurveyRecord {
                                transport: TransportSection { mode, distance_km, days_per_week },
                                electricity: ElectricitySection {
                                    bulbs_daily: bulbs,
                                    leaves_on_when_unneeded: flags & 1 != 0,
                                    uses_efficient_bulbs: flags & 2 != 0,
                                },
                                food: FoodSection {
                                    meat_meals_per_week: meals,
                                    prefers_local_seasonal: flags & 4 != 0,
                                },
                                waste: WasteSection { segregates: flags & 8 != 0, plastic_bottles_per_week: bottles },
                                awareness: flags % 3 == 0,
                            });
                        }
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn test_results_are_finite_and_non_negative() {
        let factors = EmissionFactorTable::default();
        for survey in survey_grid() {
            let result = calculate(&survey, &factors);
            let c = result.category_emissions;
            for value in [result.total_emissions, c.transport, c.electricity, c.food, c.waste] {
                assert!(value.is_finite() && value >= 0.0, "{:?} -> {:?}", survey, result);
            }
            if survey.transport.mode.is_zero_emission() {
                assert_eq!(c.transport, 0.0);
            }
        }
    }

    #[test]
    fn test_monotonic_in_quantities() {
        let factors = EmissionFactorTable::default();
        for survey in survey_grid() {
            let before = category_emissions(&survey, &factors);

            let mut farther = survey.clone();
            farther.transport.distance_km += 1.5;
            let after = category_emissions(&farther, &factors);
            assert!(after.transport >= before.transport);
            if !survey.transport.mode.is_zero_emission() && survey.transport.days_per_week > 0.0 {
                assert!(after.transport > before.transport);
            }

            if survey.transport.days_per_week < 7.0 {
                let mut more_days = survey.clone();
                more_days.transport.days_per_week += 1.0;
                assert!(category_emissions(&more_days, &factors).transport >= before.transport);
            }

            let mut brighter = survey.clone();
            brighter.electricity.bulbs_daily += 1.0;
            assert!(category_emissions(&brighter, &factors).electricity > before.electricity);

            let mut meatier = survey.clone();
            meatier.food.meat_meals_per_week += 1.0;
            assert!(category_emissions(&meatier, &factors).food > before.food);

            let mut bottled = survey.clone();
            bottled.waste.plastic_bottles_per_week += 1.0;
            let after = category_emissions(&bottled, &factors);
            assert!(after.waste > before.waste);
            assert_eq!(after.transport, before.transport);
            assert_eq!(after.electricity, before.electricity);
            assert_eq!(after.food, before.food);
        }
    }

    #[test]
    fn test_flag_effects() {
        let factors = EmissionFactorTable::default();
        for survey in survey_grid() {
            let before = category_emissions(&survey, &factors);
            let bulbs = survey.electricity.bulbs_daily > 0.0;
            let meals = survey.food.meat_meals_per_week > 0.0;
            let bottles = survey.waste.plastic_bottles_per_week > 0.0;

            if !survey.electricity.uses_efficient_bulbs {
                let mut efficient = survey.clone();
                efficient.electricity.uses_efficient_bulbs = true;
                let after = category_emissions(&efficient, &factors).electricity;
                assert!(if bulbs { after < before.electricity } else { after == before.electricity });
            }

            if !survey.electricity.leaves_on_when_unneeded {
                let mut wasteful = survey.clone();
                wasteful.electricity.leaves_on_when_unneeded = true;
                let after = category_emissions(&wasteful, &factors).electricity;
                assert!(if bulbs { after > before.electricity } else { after == before.electricity });
            }

            if !survey.food.prefers_local_seasonal {
                let mut local = survey.clone();
                local.food.prefers_local_seasonal = true;
                let after = category_emissions(&local, &factors).food;
                assert!(if meals { after < before.food } else { after == before.food });
            }

            if !survey.waste.segregates {
                let mut sorted = survey.clone();
                sorted.waste.segregates = true;
                let after = category_emissions(&sorted, &factors);
                assert!(if bottles { after.waste < before.waste } else { after.waste == before.waste });
                assert_eq!(after.transport, before.transport);
            }

            let mut aware = survey.clone();
            aware.awareness = !survey.awareness;
            assert_eq!(category_emissions(&aware, &factors), before);
        }
    }

    #[test]
    fn test_electricity_flags_compound() {
        let factors = EmissionFactorTable::default();
        let mut survey = scenario();
        survey.electricity.bulbs_daily = 1.0;
        survey.electricity.leaves_on_when_unneeded = true;
        let raw = category_emissions(&survey, &factors);
        assert!((raw.electricity - 1.05 * 6.0 * 1.1).abs() < 1e-9);
    }
}
