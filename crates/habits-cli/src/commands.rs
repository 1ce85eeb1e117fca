//! Command execution

use anyhow::{Context, Result};
use habits_core::{
    Database, Habit, NewHabit, StreakSummary, SyncConfig, SyncCoordinator, UserId,
};
use std::sync::Arc;
use tracing::debug;

use crate::{Cli, Commands};

/// Open the database, run one command, and close the database again.
pub async fn run(cli: Cli) -> Result<()> {
    let db = match &cli.db_path {
        Some(path) => Database::open(path),
        None => Database::open_default(),
    }
    .context("failed to open habits database")?;

    let mut coordinator = SyncCoordinator::new(db).with_config(SyncConfig {
        remote_timeout: cli.remote.timeout(),
    });
    if let Some(client) = cli.remote.build_client()? {
        debug!("Remote mirror enabled at {}", client.base_url());
        coordinator = coordinator.with_remote(Arc::new(client));
    }

    let user = UserId::new(cli.user);
    let result = execute(&coordinator, &user, cli.command, cli.json).await;

    coordinator
        .close()
        .context("failed to close habits database")?;
    result
}

async fn execute(
    coordinator: &SyncCoordinator,
    user: &UserId,
    command: Commands,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Add {
            title,
            description,
            frequency,
        } => {
            let habit = NewHabit::new(title, frequency, user.clone()).with_description(description);
            let created = coordinator
                .create(habit)
                .await
                .context("failed to create habit")?;
            if json {
                print_json(&created)?;
            } else if created.is_mirrored() {
                println!("Created habit {} (synced)", created.id);
            } else {
                println!("Created habit {}", created.id);
            }
        }
        Commands::List => {
            let habits = coordinator
                .queries()
                .all_habits(user)
                .context("failed to list habits")?;
            print_habits(&habits, json)?;
        }
        Commands::Top { limit } => {
            let habits = coordinator
                .queries()
                .top_streaks(limit)
                .context("failed to rank habits")?;
            print_habits(&habits, json)?;
        }
        Commands::Stats => {
            let summary = coordinator
                .queries()
                .streak_summary(user)
                .context("failed to compute streak statistics")?;
            if json {
                print_json(&summary)?;
            } else {
                print_summary(&summary);
            }
        }
        Commands::Complete { id } => {
            let habit = coordinator
                .complete(id)
                .with_context(|| format!("failed to complete habit {id}"))?;
            if json {
                print_json(&habit)?;
            } else {
                println!(
                    "{}: streak {} (best {}, {} completions)",
                    habit.title, habit.streak_count, habit.best_streak, habit.total_count
                );
            }
        }
        Commands::Delete { ids } => {
            if let [id] = ids.as_slice() {
                coordinator
                    .delete_one(*id)
                    .await
                    .with_context(|| format!("failed to delete habit {id}"))?;
                if json {
                    print_json(&serde_json::json!({ "deleted": id }))?;
                } else {
                    println!("Deleted habit {id}");
                }
            } else {
                let report = coordinator
                    .delete_many(&ids)
                    .await
                    .context("failed to delete habits")?;
                if json {
                    print_json(&report)?;
                } else {
                    println!(
                        "Deleted {} of {} habits",
                        report.deleted_locally, report.requested
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_habits(habits: &[Habit], json: bool) -> Result<()> {
    if json {
        return print_json(habits);
    }
    if habits.is_empty() {
        println!("No habits yet");
    }
    for habit in habits {
        println!("{}", format_habit(habit));
    }
    Ok(())
}

fn print_summary(summary: &StreakSummary) {
    for stats in &summary.habits {
        println!(
            "{:>4}  {:<24} {:<8} current {:>3}  best {:>3}  total {:>4}",
            stats.id.to_string(),
            stats.title,
            stats.frequency.as_str(),
            stats.current,
            stats.best,
            stats.total
        );
    }
    println!(
        "{} habits, {} completions, best streak {}",
        summary.habit_count, summary.total_completions, summary.best_streak
    );
}

/// One line per habit: id, title, frequency and streak.
pub fn format_habit(habit: &Habit) -> String {
    format!(
        "{:>4}  {:<24} {:<8} streak {} (best {})",
        habit.id.to_string(),
        habit.title,
        habit.frequency.as_str(),
        habit.streak_count,
        habit.best_streak
    )
}
