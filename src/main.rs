//! fitpet-sim — host simulator.
//!
//! Steps a pet through simulated days against a deterministic calorie
//! curve, feeding it most days and skipping a few so neglect, death and
//! the longest-lived record all show up in the log.
//!
//! ```text
//! fitpet-sim [DAYS]            in-memory store, 60 days by default
//! FITPET_DATA=./pet fitpet-sim  persist under ./pet (config.json + archive/)
//! RUST_LOG=debug fitpet-sim     verbose
//! ```
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  SimulatedClock   LogEventSink   LogNotifier   FileStore │
//! │  ─────────────── Port Trait Boundary ──────────────────  │
//! │            AppService ◀── CalorieFeed ◀── provider        │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::collections::BTreeMap;
use std::env;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};

use fitpet::adapters::clock::{SimulatedClock, SystemClock};
use fitpet::adapters::file_store::FileStore;
use fitpet::adapters::log_sink::LogEventSink;
use fitpet::adapters::memory_store::MemoryStore;
use fitpet::adapters::notifier::LogNotifier;
use fitpet::app::commands::AppCommand;
use fitpet::app::ports::{ClockPort, ConfigError, ConfigPort, StoragePort};
use fitpet::app::service::AppService;
use fitpet::events::{CalorieFeed, CalorieReading};
use fitpet::fsm::Stage;

const DEFAULT_DAYS: u32 = 60;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let days = match env::args().nth(1) {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid day count: {arg}"))?,
        None => DEFAULT_DAYS,
    };

    match env::var_os("FITPET_DATA") {
        Some(dir) => {
            let mut store = FileStore::open(&dir)
                .with_context(|| format!("cannot open data directory {}", dir.to_string_lossy()))?;
            run(&mut store, days)
        }
        None => run(&mut MemoryStore::new(), days),
    }
}

/// Active kcal burned on simulated day `day`.  Varies between 120 and 379.
fn burn_for(day: u32) -> f64 {
    f64::from(120 + (day * 37) % 260)
}

/// Days the simulated user forgets the pet entirely.
fn skipped(day: u32) -> bool {
    matches!(day % 40, 30..=32)
}

fn run<S: StoragePort + ConfigPort>(store: &mut S, days: u32) -> Result<()> {
    let config = AppService::load_config(&*store);
    if matches!(store.load(), Err(ConfigError::NotFound)) {
        if let Err(e) = store.save(&config) {
            warn!("Could not write default config: {e}");
        }
    }

    let morning = NaiveTime::from_hms_opt(8, 0, 0).context("invalid time")?;
    let start = SystemClock::new().now().date();
    let clock = SimulatedClock::new(start.and_time(morning));

    let feed = CalorieFeed::new();
    let mut sink = LogEventSink::new();
    let mut notifier = LogNotifier::new();
    let mut app = AppService::load(config, store, clock.now())
        .context("cannot load the active pet")?;
    app.start(&mut sink, clock.now());

    // What the activity provider has seen, per calendar day.
    let mut burned: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for day in 0..days {
        let date = start + Duration::days(i64::from(day));
        clock.set(date.and_time(morning));
        info!("──────── day {day} ({date}) ────────");

        // Morning sync: part of the day's burn so far.
        let total = burn_for(day);
        provide(&feed, &mut burned, &app, clock.now(), total * 0.4);
        app.drain_readings(&feed, store, &mut sink, &mut notifier, clock.now());

        // Evening sync: the full day.
        clock.advance_hours(10);
        provide(&feed, &mut burned, &app, clock.now(), total);
        if day % 9 == 4 {
            feed.push(CalorieReading::Unavailable { at: clock.now() });
        }
        app.drain_readings(&feed, store, &mut sink, &mut notifier, clock.now());

        while app.is_ready_to_evolve() {
            let now = clock.now();
            if !app.handle_command(AppCommand::Evolve, now, store, &mut sink, &mut notifier) {
                break;
            }
        }

        if skipped(day) {
            info!("(user forgot the pet today)");
        } else if app.pet().stage != Stage::Egg {
            let meals = app.snapshot(date).food_remaining.max(1);
            for _ in 0..meals {
                app.handle_command(
                    AppCommand::Feed,
                    clock.now(),
                    store,
                    &mut sink,
                    &mut notifier,
                );
            }
        }

        // Nightly check: an unfed day counts as missed.
        clock.advance_hours(4);
        let now = clock.now();
        app.handle_command(
            AppCommand::CheckHealth,
            now,
            store,
            &mut sink,
            &mut notifier,
        );
    }

    if !app.flush(store, &mut sink, clock.now()) {
        warn!("Final save failed");
    }
    app.save_config_if_dirty(&*store);

    let pet = app.pet();
    info!(
        "Done after {days} days: {} {} age {} streak {} ({} notifications)",
        pet.species.name(),
        pet.stage.name(),
        pet.age,
        pet.streak,
        notifier.sent()
    );
    match app.longest_lived(&*store) {
        Some(r) => info!(
            "Longest-lived: {} {} reached {} days, {:.0} kcal, died {} ({})",
            r.species.name(),
            r.stage.name(),
            r.age,
            r.total_calories_consumed,
            r.died_at.date(),
            r.cause
        ),
        None => info!("Longest-lived: none yet"),
    }
    Ok(())
}

/// Activity provider: record today's running total and queue it.  While
/// the pet is an egg the incubation sum since creation goes out as well.
fn provide(
    feed: &CalorieFeed,
    burned: &mut BTreeMap<NaiveDate, f64>,
    app: &AppService,
    at: NaiveDateTime,
    kcal_today: f64,
) {
    burned.insert(at.date(), kcal_today);
    feed.push(CalorieReading::Daily { at, kcal: kcal_today });

    let pet = app.pet();
    if pet.stage == Stage::Egg {
        let since = pet.created_at.date();
        let kcal: f64 = burned.range(since..).map(|(_, v)| v).sum();
        feed.push(CalorieReading::SinceDate { since, at, kcal });
    }
}
