use serde::{Deserialize, Serialize};

/// Round to 2 decimal places, half away from zero.
///
/// Applied to the binary value, so inputs like 1.005 (stored as
/// 1.00499999...) round down.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weekly kg CO2e per category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryEmissions {
    pub transport: f64,
    pub electricity: f64,
    pub food: f64,
    pub waste: f64,
}

impl CategoryEmissions {
    pub fn sum(&self) -> f64 {
        self.transport + self.electricity + self.food + self.waste
    }

    pub fn rounded(&self) -> Self {
        Self {
            transport: round2(self.transport),
            electricity: round2(self.electricity),
            food: round2(self.food),
            waste: round2(self.waste),
        }
    }

    /// (label, value) pairs in display order
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Transport", self.transport),
            ("Electricity", self.electricity),
            ("Food", self.food),
            ("Waste", self.waste),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_emissions: f64,
    pub category_emissions: CategoryEmissions,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl CalculationResult {
    pub fn with_tips(mut self, tips: Vec<String>) -> Self {
        self.tips = tips;
        self
    }

    pub fn verdict(&self, average: f64) -> Verdict {
        Verdict::for_total(self.total_emissions, average)
    }

    pub fn share_text(&self) -> String {
        format!(
            "I just calculated my carbon footprint with EcoFootprint Explorers! It's {} kg CO₂ per week. Let's save the planet together!",
            self.total_emissions
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    EcoHero,
    BelowAverage,
    AboveAverage,
}

impl Verdict {
    const ECO_HERO_THRESHOLD: f64 = 10.0;

    pub fn for_total(total: f64, average: f64) -> Self {
        if total < Self::ECO_HERO_THRESHOLD {
            Verdict::EcoHero
        } else if total < average {
            Verdict::BelowAverage
        } else {
            Verdict::AboveAverage
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::EcoHero => "🌍 Great job, Eco Hero! You’re a true planet saver!",
            Verdict::BelowAverage => "👍 Well done! Your carbon footprint is below average. Keep it up!",
            Verdict::AboveAverage => "⚠️ Your carbon footprint is a bit high. Let's see how we can improve!",
        }
    }
}
