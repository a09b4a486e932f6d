use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::{theme::ColorfulTheme, Select};
use millionaire_core::{
    ContractProbe, LeaderboardSource, LocalSigner, QuestionCatalog, SampleLeaderboard, StaticProbe,
};
use millionaire_game::{GameController, Lifeline, LifelineOutcome, Phase};
use std::collections::HashSet;
use std::sync::Arc;

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Run one interactive game session.
pub async fn play() -> Result<()> {
    let catalog = QuestionCatalog::load();
    print_ladder(&catalog);

    let controller = GameController::new(catalog, Arc::new(LocalSigner))?;
    controller.start();
    tracing::debug!("Interactive session started");

    // Options suppressed by fifty-fifty, cleared on question change.
    let mut removed: HashSet<usize> = HashSet::new();
    let mut shown_index = 0usize;

    loop {
        let snapshot = controller.snapshot();
        match snapshot.phase {
            Phase::AwaitingSelection | Phase::Selected => {
                if snapshot.question_index != shown_index {
                    shown_index = snapshot.question_index;
                    removed.clear();
                }

                let question = controller.current_question()?;
                println!();
                println!(
                    "Question #{} - for ${}",
                    snapshot.question_index + 1,
                    question.prize
                );
                println!("{}", question.prompt);

                let mut items: Vec<String> = Vec::new();
                let mut actions: Vec<Action> = Vec::new();
                for (i, option) in question.options.iter().enumerate() {
                    if removed.contains(&i) {
                        continue;
                    }
                    items.push(format!("{}. {}", OPTION_LETTERS[i], option));
                    actions.push(Action::Answer(i));
                }
                for lifeline in [
                    Lifeline::FiftyFifty,
                    Lifeline::AskAudience,
                    Lifeline::PhoneAFriend,
                ] {
                    if snapshot.lifelines.is_available(lifeline) {
                        items.push(format!("Use lifeline: {}", lifeline));
                        actions.push(Action::UseLifeline(lifeline));
                    }
                }

                let choice = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Your move")
                    .items(&items)
                    .default(0)
                    .interact()?;

                match actions[choice] {
                    Action::Answer(i) => {
                        controller.select_option(i)?;
                        submit(&controller).await?;
                    }
                    Action::UseLifeline(lifeline) => match controller.use_lifeline(lifeline)? {
                        LifelineOutcome::Removed(indices) => {
                            removed.extend(indices);
                            println!("Two wrong answers eliminated.");
                        }
                        LifelineOutcome::Consumed => {
                            println!("{} used. Trust your gut!", lifeline);
                        }
                    },
                }
            }
            Phase::Ended => {
                println!();
                println!("Game over. You won: ${}", snapshot.prize);
                if snapshot.prize >= 1_000_000 {
                    println!("Congratulations, millionaire!");
                }
                return Ok(());
            }
            // Reveal delay still running; wait for the auto-advance.
            Phase::Revealed => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
            Phase::NotStarted => controller.start(),
        }
    }
}

enum Action {
    Answer(usize),
    UseLifeline(Lifeline),
}

async fn submit(controller: &GameController) -> Result<()> {
    println!("Decrypting with FHE...");
    match controller.submit_answer().await {
        Ok(outcome) => {
            if outcome.correct {
                println!("Correct! ${} secured!", outcome.prize);
            } else {
                let question = controller.current_question()?;
                println!(
                    "Sorry, that's incorrect. The answer was {}. {}",
                    OPTION_LETTERS[outcome.correct_answer],
                    question.options[outcome.correct_answer]
                );
            }
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            println!("Submission did not go through: {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_ladder(catalog: &QuestionCatalog) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Level", "Prize"]);
    for (i, prize) in catalog.prize_ladder().iter().enumerate().rev() {
        table.add_row(vec![format!("{}", i + 1), format!("${}", prize)]);
    }
    println!("{}", table);
}

/// Fetch and render the leaderboard.
pub async fn leaderboard() -> Result<()> {
    let entries = SampleLeaderboard.fetch().await?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rank", "Player", "Address", "Score", "Level"]);
    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            entry.name.clone(),
            entry.short_address(),
            format!("${}", entry.score),
            format!("{}", entry.level),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Probe the question contract and report the result.
pub async fn check_contract() -> Result<()> {
    let probe = StaticProbe::new(true);
    match probe.check_available().await {
        Ok(true) => println!("Contract is available and ready to use!"),
        Ok(false) => println!("Contract is currently unavailable"),
        Err(e) => println!("Error checking contract availability: {}", e),
    }
    Ok(())
}
