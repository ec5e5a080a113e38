use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use std::str::FromStr;

use habitual::db::{ChallengeRepo, HabitRepo, Store};
use habitual::engine::{
    self, completion_rate, last_n_days_status, total_days_inclusive, user_stats,
};
use habitual::models::{
    suggestions_for_goals, Category, Habit, HabitFrequency, NewChallenge, NewHabit,
};
use habitual::utils::date::{format_date, parse_date};
use habitual::utils::format::{day_dots, format_rate, pad_display, progress_bar};

use crate::cli::args::ChallengeCommands;
use crate::config::{AppConfig, StorageBackend};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";

const NAME_WIDTH: usize = 28;

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn date_or_today(on: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match on {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today),
    }
}

fn find_habit(store: &dyn Store, query: &str) -> Result<Habit> {
    HabitRepo::find(store, query)?.ok_or_else(|| anyhow!("Habit '{}' not found", query))
}

/// Resolve a full challenge id from a unique prefix.
fn resolve_challenge_id(store: &dyn Store, prefix: &str) -> Result<String> {
    let matches: Vec<String> = ChallengeRepo::load(store)?
        .into_iter()
        .map(|c| c.id)
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("Challenge '{}' not found", prefix),
        _ => bail!("Challenge id '{}' is ambiguous", prefix),
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

pub fn handle_init(config: &mut AppConfig, backend: &str, user: Option<&str>) -> Result<()> {
    config.storage.backend = match backend {
        "sqlite" => StorageBackend::Sqlite,
        "file" => StorageBackend::File,
        other => bail!("Unknown storage backend '{}'. Use: sqlite, file", other),
    };
    if let Some(user) = user {
        config.user.user_id = user.to_string();
    }
    config.save()?;
    AppConfig::ensure_data_dir()?;
    println_colored!(GREEN, "  ✓ Config written to {:?}", AppConfig::config_path()?);
    Ok(())
}

// ─── Habits ──────────────────────────────────────────────────────────────────

pub fn handle_add(store: &dyn Store, config: &AppConfig, mut draft: NewHabit) -> Result<()> {
    if draft.frequency == HabitFrequency::Custom
        && draft.custom_days.as_ref().is_none_or(|d| d.is_empty())
    {
        bail!("Custom frequency needs --days, e.g. --days 1,3,5");
    }
    draft.user_id.get_or_insert_with(|| config.user.user_id.clone());
    let habit = HabitRepo::create(store, draft, &new_id(), Utc::now())?;
    println_colored!(GREEN, "  ✓ Added habit: {} ({})", habit.name, short_id(&habit.id));
    Ok(())
}

pub fn build_new_habit(
    name: &str,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    freq: &str,
    days: &[u8],
) -> Result<NewHabit> {
    let frequency = HabitFrequency::from_str(freq)
        .map_err(|_| anyhow!("Unknown frequency '{}'. Use: daily, weekly, custom", freq))?;
    if let Some(bad) = days.iter().find(|d| **d > 6) {
        bail!("Weekday {} out of range, use 0 (Sunday) to 6 (Saturday)", bad);
    }
    let custom_days = (!days.is_empty()).then(|| days.iter().copied().collect::<BTreeSet<_>>());
    Ok(NewHabit {
        name: name.to_string(),
        description,
        icon,
        color,
        frequency,
        custom_days,
        ..Default::default()
    })
}

pub fn handle_list(
    store: &dyn Store,
    config: &AppConfig,
    today: NaiveDate,
    mine: bool,
) -> Result<()> {
    let stored = if mine {
        HabitRepo::get_by_user(store, &config.user.user_id)?
    } else {
        HabitRepo::load(store)?
    };
    let habits: Vec<Habit> = stored
        .iter()
        .map(|h| engine::refresh_streaks(h, today))
        .collect();

    println!();
    println_colored!(BOLD, "  Habits — {}", format_date(today));
    println!();
    if habits.is_empty() {
        println_colored!(DIM, "  No habits yet. Add one with: habitual add \"Read 20 pages\"");
        println!();
        return Ok(());
    }

    let window = config.stats.completion_window_days;
    for habit in &habits {
        let label = match &habit.icon {
            Some(icon) => format!("{} {}", icon, habit.name),
            None => habit.name.clone(),
        };
        let status = match habit.entry_for(today) {
            Some(true) => format!("{}✓\x1b[0m", GREEN),
            _ if !habit.is_due_on(today) => format!("{}-\x1b[0m", DIM),
            _ => "○".to_string(),
        };
        println!(
            "  {}  {}  streak {:>3}  best {:>3}  {}d {:>6}  {}",
            status,
            pad_display(&label, NAME_WIDTH),
            habit.current_streak,
            habit.longest_streak,
            window,
            format_rate(completion_rate(&habit.tracking_data, today, window)),
            short_id(&habit.id),
        );
    }
    println!();
    Ok(())
}

pub fn handle_toggle(
    store: &dyn Store,
    query: &str,
    on: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let date = date_or_today(on, today)?;
    if date > today {
        bail!("Cannot record {} — it is in the future", format_date(date));
    }
    let habit = find_habit(store, query)?;
    let updated = HabitRepo::toggle_completion(store, &habit.id, date, today)
        .with_context(|| format!("Toggling {}", habit.name))?;

    if updated.is_completed_on(date) {
        println_colored!(
            GREEN,
            "  ✓ {} — done on {}  (streak {}, best {})",
            updated.name,
            format_date(date),
            updated.current_streak,
            updated.longest_streak
        );
    } else {
        println_colored!(
            DIM,
            "  ○ {} — unmarked on {}  (streak {})",
            updated.name,
            format_date(date),
            updated.current_streak
        );
    }
    Ok(())
}

pub fn handle_remove(store: &dyn Store, query: &str) -> Result<()> {
    let habit = find_habit(store, query)?;
    if HabitRepo::delete(store, &habit.id)? {
        println_colored!(AMBER, "  Removed habit: {}", habit.name);
    }
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    store: &dyn Store,
    config: &AppConfig,
    today: NaiveDate,
    week: bool,
) -> Result<()> {
    let habits: Vec<Habit> = HabitRepo::load(store)?
        .iter()
        .map(|h| engine::refresh_streaks(h, today))
        .collect();
    let challenges = ChallengeRepo::load(store)?;
    let stats = user_stats(&habits, &challenges, &config.user.user_id, today);

    println!();
    println_colored!(BOLD, "  Statistics");
    println!();
    println!("  Habits:        {}", stats.habits.total_habits);
    println!("  Best streak:   {} days", stats.habits.active_streak);
    println!(
        "  30d rate:      {}  {}",
        progress_bar(stats.habits.completion_rate.round() as u32, 100, 20),
        format_rate(stats.habits.completion_rate)
    );
    println!("  Completions:   {}", stats.habits.total_completions);
    println!(
        "  Challenges:    {} joined, {} completed",
        stats.challenges_joined, stats.challenges_completed
    );

    if week && !habits.is_empty() {
        let days = config.stats.grid_days;
        println!();
        println_colored!(DIM, "  Last {} days  (● = done, ○ = not done)", days);
        println!();
        for habit in &habits {
            let grid: Vec<bool> = last_n_days_status(&habit.tracking_data, today, days)
                .iter()
                .map(|d| d.completed)
                .collect();
            println!("  {}  {}", pad_display(&habit.name, NAME_WIDTH), day_dots(&grid));
        }
    }
    println!();
    Ok(())
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

pub fn handle_suggest(
    store: &dyn Store,
    config: &AppConfig,
    categories: &[String],
    add: bool,
) -> Result<()> {
    let categories = categories
        .iter()
        .map(|c| Category::from_str(c))
        .collect::<Result<Vec<_>>>()?;
    let suggestions = suggestions_for_goals(&categories);

    println!();
    for suggestion in &suggestions {
        println!(
            "  {}  {}  {}",
            pad_display(&format!("{} {}", suggestion.icon, suggestion.name), NAME_WIDTH),
            pad_display(suggestion.frequency.as_str(), 7),
            suggestion.description
        );
    }
    println!();

    if add {
        let mut habits = HabitRepo::load(store)?;
        let mut added = 0;
        for suggestion in &suggestions {
            if habits.iter().any(|h| h.name.eq_ignore_ascii_case(suggestion.name)) {
                continue;
            }
            let mut habit = suggestion.to_habit(new_id(), Utc::now());
            habit.user_id = Some(config.user.user_id.clone());
            habits.push(habit);
            added += 1;
        }
        HabitRepo::save(store, &habits)?;
        println_colored!(GREEN, "  ✓ Added {} habits", added);
    }
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(store: &dyn Store) -> Result<()> {
    let habits = HabitRepo::load(store)?;
    let challenges = ChallengeRepo::load(store)?;
    let doc = serde_json::json!({ "habits": habits, "challenges": challenges });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

// ─── Challenges ──────────────────────────────────────────────────────────────

pub fn handle_challenge(
    store: &dyn Store,
    config: &AppConfig,
    today: NaiveDate,
    action: &ChallengeCommands,
) -> Result<()> {
    let user_id = config.user.user_id.as_str();

    match action {
        ChallengeCommands::Create {
            title,
            start,
            end,
            category,
            description,
            public,
        } => {
            let draft = NewChallenge {
                title: title.clone(),
                description: description.clone(),
                creator_id: user_id.to_string(),
                start_date: parse_date(start)?,
                end_date: parse_date(end)?,
                category: Category::from_str(category)?,
                is_public: *public,
                habit_template: None,
            };
            let challenge = ChallengeRepo::create(store, draft, &new_id(), Utc::now())?;
            ChallengeRepo::join(store, &challenge.id, user_id, Utc::now())?;
            println_colored!(
                GREEN,
                "  ✓ Created challenge: {} ({})",
                challenge.title,
                short_id(&challenge.id)
            );
        }
        ChallengeCommands::List { public } => {
            let challenges = if *public {
                ChallengeRepo::get_public(store)?
            } else {
                ChallengeRepo::get_by_user(store, user_id)?
            };
            println!();
            if challenges.is_empty() {
                println_colored!(DIM, "  No challenges");
            }
            for c in &challenges {
                let status = if c.end_date < today {
                    "ended"
                } else if c.start_date > today {
                    "upcoming"
                } else {
                    "active"
                };
                println_colored!(
                    BOLD,
                    "  {}  {}  [{}]",
                    short_id(&c.id),
                    c.title,
                    c.category
                );
                println!(
                    "      {} → {}  {}  {} participants",
                    format_date(c.start_date),
                    format_date(c.end_date),
                    status,
                    c.participants.len()
                );
                if let Some(p) = c.participant(user_id) {
                    println!(
                        "      {}  {}%  {}/{} days",
                        progress_bar(p.progress as u32, 100, 20),
                        p.progress,
                        c.completed_in_range(p),
                        total_days_inclusive(c.start_date, c.end_date)
                    );
                }
            }
            println!();
        }
        ChallengeCommands::Join { id } => {
            let id = resolve_challenge_id(store, id)?;
            let participant = ChallengeRepo::join(store, &id, user_id, Utc::now())?;
            println_colored!(
                GREEN,
                "  ✓ Joined challenge {} (progress {}%)",
                short_id(&id),
                participant.progress
            );
        }
        ChallengeCommands::Leave { id } => {
            let id = resolve_challenge_id(store, id)?;
            if ChallengeRepo::leave(store, &id, user_id)? {
                println_colored!(AMBER, "  Left challenge {}", short_id(&id));
            } else {
                println_colored!(DIM, "  You are not in challenge {}", short_id(&id));
            }
        }
        ChallengeCommands::Mark { id, on, undo } => {
            let id = resolve_challenge_id(store, id)?;
            let date = date_or_today(on.as_deref(), today)?;
            let participant = ChallengeRepo::update_progress(store, &id, user_id, date, !undo)?;
            let color = if participant.is_complete() { GREEN } else { AMBER };
            println_colored!(
                color,
                "  {} {}  {}%",
                if *undo { "○" } else { "✓" },
                progress_bar(participant.progress as u32, 100, 20),
                participant.progress
            );
        }
        ChallengeCommands::Delete { id } => {
            let id = resolve_challenge_id(store, id)?;
            let challenge = ChallengeRepo::get_by_id(store, &id)?;
            if challenge.creator_id != user_id {
                println_colored!(RED, "  ✗ Only the creator can delete this challenge");
                return Ok(());
            }
            ChallengeRepo::delete(store, &id)?;
            println_colored!(AMBER, "  Deleted challenge {}", challenge.title);
        }
    }
    Ok(())
}
