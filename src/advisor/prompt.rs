//! Prompt Templates
//! 
//! Handlebars templates for the two generation calls. Each prompt ends with
//! the JSON schema the reply must follow.

use handlebars::{Handlebars, RenderError, TemplateError};
use schemars::schema_for;
use serde_json::json;

use super::quiz::QuizOutput;
use super::tips::TipsOutput;
use crate::calculator::SurveyRecord;

const TIPS_TEMPLATE_NAME: &str = "personalized_tips";

pub const TIPS_TEMPLATE: &str = r#"Based on the following answers, give personalized tips for reducing this student's carbon footprint. The tips should suit the person's actual circumstances better than the raw calculation alone suggests.

Transport:
- Travel to school: {{{survey.transport.mode}}}
- Distance to school: {{{survey.transport.distanceKm}}} km (one way)
- Days per week: {{{survey.transport.daysPerWeek}}}

Electricity & Home:
- Light bulbs used daily: {{{survey.electricity.bulbsDaily}}}
- Lights/fans left on when not needed: {{#if survey.electricity.leavesOnWhenUnneeded}}Yes{{else}}No{{/if}}
- Energy-saving bulbs: {{#if survey.electricity.usesEfficientBulbs}}Yes{{else}}No{{/if}}

Food:
- Meat meals per week: {{{survey.food.meatMealsPerWeek}}}
- Prefers local/seasonal food: {{#if survey.food.prefersLocalSeasonal}}Yes{{else}}No{{/if}}

Waste & Recycling:
- Segregates waste: {{#if survey.waste.segregates}}Yes{{else}}No{{/if}}
- Plastic bottles per week: {{{survey.waste.plasticBottlesPerWeek}}}

Awareness:
- Planted a tree or joined an environmental event recently: {{#if survey.awareness}}Yes{{else}}No{{/if}}

Write each tip in markdown. Keep the tips concise. Give exactly {{tip_count}} tips.

Reply with a single JSON object matching this schema and nothing else:
{{{schema}}}"#;

pub const TIPS_SYSTEM: &str =
    "You are a friendly environmental coach for high school students. You only answer in JSON.";

pub const QUIZ_SYSTEM: &str =
    "You are an environmental science teacher writing classroom quizzes. You only answer in JSON.";

pub const TIP_COUNT: usize = 3;
pub const QUIZ_QUESTION_COUNT: usize = 5;
pub const QUIZ_OPTION_COUNT: usize = 4;

pub struct PromptBuilder {
    registry: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(TIPS_TEMPLATE_NAME, TIPS_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn tips_prompt(&self, survey: &SurveyRecord) -> Result<String, RenderError> {
        let schema = serde_json::to_string_pretty(&schema_for!(TipsOutput)).unwrap_or_default();
        let data = json!({
            "survey": survey,
            "tip_count": TIP_COUNT,
            "schema": schema,
        });
        self.registry.render(TIPS_TEMPLATE_NAME, &data)
    }

    /// The quiz request takes no input, so the prompt is fixed
    pub fn quiz_prompt(&self) -> String {
        let schema = serde_json::to_string_pretty(&schema_for!(QuizOutput)).unwrap_or_default();
        format!(
            "Generate a {count}-question multiple-choice quiz about climate change, carbon footprint, \
             and environmental conservation, suitable for high school students.\n\
             For each question give the question text, exactly {options} options, the zero-based index \
             of the correct option, and a short explanation of the correct answer.\n\
             Cover a range of topics within the environmental theme.\n\n\
             Reply with a single JSON object matching this schema and nothing else:\n{schema}",
            count = QUIZ_QUESTION_COUNT,
            options = QUIZ_OPTION_COUNT,
            schema = schema,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TransportMode;

    #[test]
    fn test_tips_prompt_mirrors_survey() {
        let mut survey = SurveyRecord::default();
        survey.transport.mode = TransportMode::Motorcycle;
        survey.electricity.uses_efficient_bulbs = true;
        survey.awareness = true;

        let prompt = PromptBuilder::new().unwrap().tips_prompt(&survey).unwrap();
        assert!(prompt.contains("Travel to school: Motorcycle"));
        assert!(prompt.contains("Energy-saving bulbs: Yes"));
        assert!(prompt.contains("Lights/fans left on when not needed: No"));
        assert!(prompt.contains("recently: Yes"));
        assert!(prompt.contains("Give exactly 3 tips."));
        assert!(prompt.contains("\"tips\""));
    }

    #[test]
    fn test_quiz_prompt_embeds_schema() {
        let prompt = PromptBuilder::new().unwrap().quiz_prompt();
        assert!(prompt.contains("5-question multiple-choice quiz"));
        assert!(prompt.contains("correctAnswerIndex"));
    }
}
