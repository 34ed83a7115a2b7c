//! EcoFootprint Explorers
//! 
//! Interactive terminal front end: answer the survey, see your weekly
//! footprint with tips, browse history, take a quiz, pledge a tree.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

use eco_footprint::advisor::{AnswerStatus, QuizSession};
use eco_footprint::agent::build_provider;
use eco_footprint::calculator::{TransportMode, AVERAGE_FOOTPRINT_PER_WEEK};
use eco_footprint::config::{AppConfig, DEFAULT_CONFIG_FILE};
use eco_footprint::storage::{trend_of, FileStore, HistoryEntry, KeyValueStore};
use eco_footprint::telemetry::init_logging;
use eco_footprint::validation::SurveyDraft;
use eco_footprint::{CalculationResult, FootprintError, FootprintService};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT HELPERS
// ──────────────────────────────────────────────────────────────────────────────

/// Stdin closed (Ctrl-D or the end of piped input)
#[derive(Debug, thiserror::Error)]
#[error("end of input")]
struct EndOfInput;

fn next_line(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(EndOfInput.into());
    }
    Ok(input.trim().to_string())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    next_line(&mut io::stdin().lock())
}

/// Empty input keeps the default
fn ask_text(question: &str, default: &str) -> Result<String> {
    let answer = read_line(&format!("   {} [{}]: ", question, default))?;
    Ok(if answer.is_empty() { default.to_string() } else { answer })
}

fn ask_yes_no(question: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = read_line(&format!("   {} [{}]: ", question, hint))?;
    Ok(match answer.to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}

fn ask_survey(defaults: &SurveyDraft) -> Result<SurveyDraft> {
    let modes: Vec<&str> = TransportMode::ALL.iter().map(|m| m.as_str()).collect();

    println!("\n🚗 Transport");
    let mode = ask_text(&format!("How do you usually get to school? ({})", modes.join("/")), &defaults.mode)?;
    let distance_km = ask_text("One-way distance to school (km)", &defaults.distance_km)?;
    let days_per_week = ask_text("Days per week you travel to school", &defaults.days_per_week)?;

    println!("\n💡 Electricity & Home");
    let bulbs_daily = ask_text("Light bulbs used daily", &defaults.bulbs_daily)?;
    let leaves_on_when_unneeded = ask_yes_no("Lights/fans left on when not needed?", defaults.leaves_on_when_unneeded)?;
    let uses_efficient_bulbs = ask_yes_no("Energy-saving bulbs?", defaults.uses_efficient_bulbs)?;

    println!("\n🍽️  Food");
    let meat_meals_per_week = ask_text("Meat meals per week", &defaults.meat_meals_per_week)?;
    let prefers_local_seasonal = ask_yes_no("Prefer local/seasonal food?", defaults.prefers_local_seasonal)?;

    println!("\n♻️  Waste & Recycling");
    let segregates = ask_yes_no("Do you segregate waste?", defaults.segregates)?;
    let plastic_bottles_per_week = ask_text("Plastic bottles per week", &defaults.plastic_bottles_per_week)?;

    println!("\n🌱 Awareness");
    let awareness = ask_yes_no("Planted a tree or joined an environmental event recently?", defaults.awareness)?;

    Ok(SurveyDraft {
        mode,
        distance_km,
        days_per_week,
        bulbs_daily,
        leaves_on_when_unneeded,
        uses_efficient_bulbs,
        meat_meals_per_week,
        prefers_local_seasonal,
        segregates,
        plastic_bottles_per_week,
        awareness,
    })
}

// ──────────────────────────────────────────────────────────────────────────────
// RENDERING
// ──────────────────────────────────────────────────────────────────────────────

fn print_result(result: &CalculationResult) {
    println!("\n{}", "─".repeat(50));
    println!("🌍 Your weekly footprint: {} kg CO₂e", result.total_emissions);
    println!("{}", result.verdict(AVERAGE_FOOTPRINT_PER_WEEK).message());
    println!("   (student average: {} kg CO₂e/week)", AVERAGE_FOOTPRINT_PER_WEEK);
    println!();
    for (label, value) in result.category_emissions.entries() {
        println!("   {:<12} {:>8.2} kg", label, value);
    }
    if !result.tips.is_empty() {
        println!("\n🌿 Personalized Green Tips:");
        for tip in &result.tips {
            println!("   • {}", tip);
        }
    }
    println!("\n📣 {}", result.share_text());
    println!("{}\n", "─".repeat(50));
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("\n📭 No results yet! Use 'calc' to see your carbon footprint history.\n");
        return;
    }
    println!("\n📜 My Past Results:");
    for entry in entries {
        let when = entry
            .timestamp()
            .map(|t| t.format("%B %-d, %Y at %-I:%M %p").to_string())
            .unwrap_or_else(|| entry.date.clone());
        println!("   {}  {} kg CO₂e", when, entry.result.total_emissions);
    }
    if let Some(trend) = trend_of(entries) {
        println!("\n📈 Your footprint is trending {}! {}", trend, trend.message());
    }
    println!();
}

async fn run_quiz(service: &FootprintService) -> Result<()> {
    println!("\n🧠 Generating quiz...");
    let questions = service.load_quiz().await;
    if questions.is_empty() {
        println!("❌ Failed to load quiz. Type 'quiz' to try again.\n");
        return Ok(());
    }

    let mut session = QuizSession::new(questions);
    while let Some(question) = session.current().cloned() {
        println!("\nQuestion {}/{}: {}", session.position(), session.total(), question.question);
        for (i, option) in question.options.iter().enumerate() {
            println!("   {}. {}", i + 1, option);
        }
        let choice = loop {
            let raw = read_line("   Your answer (1-4): ")?;
            match raw.parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => break n - 1,
                _ => println!("   Please enter a number between 1 and {}.", question.options.len()),
            }
        };
        match session.answer(choice) {
            AnswerStatus::Correct => println!("   ✅ Correct! {}", question.explanation),
            _ => println!(
                "   ❌ Not quite. The answer is '{}'. {}",
                question.options[question.correct_answer_index], question.explanation
            ),
        }
        if !session.advance() {
            break;
        }
    }
    println!("\n🏁 Score: {} / {}. {}\n", session.score(), session.total(), session.closing_message());
    Ok(())
}

async fn run_pledge(service: &FootprintService) -> Result<()> {
    if let Some(existing) = service.pledges().current().await {
        println!("\n🌳 {}", existing.summary());
        println!("   Type 'unpledge' to make a new pledge.\n");
        return Ok(());
    }
    let name = read_line("   Your name: ")?;
    let trees = read_line("   Trees to plant [1]: ")?;
    let tree_count = if trees.is_empty() { 1 } else { trees.parse::<u32>().unwrap_or(0) };
    match service.pledges().pledge(&name, tree_count).await {
        Ok(pledge) => println!("\n🎉 {}\n", pledge.summary()),
        Err(e) => println!("\n⚠️  {}\n", e.user_message()),
    }
    Ok(())
}

// ──────────────────────────────────────────────────────────────────────────────
// COMMANDS
// ──────────────────────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

async fn run_command(command: &str, service: &FootprintService, last_draft: &mut SurveyDraft) -> Result<Flow> {
    match command.to_lowercase().as_str() {
        "" => {}
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "calc" | "c" => {
            let draft = ask_survey(last_draft)?;
            println!("\n⚙️  Calculating...");
            match service.submit(&draft).await {
                Ok(result) => print_result(&result),
                Err(FootprintError::Validation(errors)) => {
                    println!("\n⚠️  Please fix the following:");
                    for field in errors.fields() {
                        println!("   • {}", field);
                    }
                    println!();
                }
                Err(e) => println!("\n❌ {}\n", e.user_message()),
            }
            *last_draft = draft;
        }
        "history" | "h" => print_history(&service.history().load().await),
        "clear" => match service.history().clear().await {
            Ok(()) => println!("\n🗑️  History cleared.\n"),
            Err(e) => println!("\n❌ {}\n", FootprintError::Storage(format!("{:#}", e)).user_message()),
        },
        "quiz" => run_quiz(service).await?,
        "pledge" => run_pledge(service).await?,
        "unpledge" => match service.pledges().reset().await {
            Ok(()) => println!("\n↩️  Pledge removed.\n"),
            Err(e) => println!("\n❌ {}\n", FootprintError::Storage(format!("{:#}", e)).user_message()),
        },
        other => println!("\n❓ Unknown command '{}'.\n", other),
    }
    Ok(Flow::Continue)
}

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config_path = std::env::var("ECO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = AppConfig::load(&config_path).await?;
    init_logging(&config.log_level)?;
    info!("Loaded configuration (provider {:?}, model {})", config.provider, config.model);

    let provider = build_provider(&config)?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_file));
    let service = FootprintService::from_config(&config, provider, store)?;

    println!("\n{}", "═".repeat(60));
    println!("🌱 EcoFootprint Explorers v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));
    println!("💡 Commands: 'calc' | 'history' | 'clear' | 'quiz' | 'pledge' | 'unpledge' | 'quit'\n");

    let mut last_draft = SurveyDraft::default();

    loop {
        let outcome = match read_line("🌍 > ") {
            Ok(command) => run_command(&command, &service, &mut last_draft).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is::<EndOfInput>() => break,
            Err(e) => return Err(e),
        }
    }

    println!("\n👋 Goodbye!\n");
    Ok(())
}
