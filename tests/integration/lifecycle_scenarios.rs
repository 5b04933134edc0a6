//! Whole-life scenarios driven day by day.

use super::mock_ports::{MockStore, RecordingNotifier, RecordingSink, StepClock, day};

use fitpet::app::commands::AppCommand;
use fitpet::app::events::{AppEvent, Notification};
use fitpet::app::ports::ClockPort;
use fitpet::app::service::AppService;
use fitpet::config::PetConfig;
use fitpet::events::CalorieReading;
use fitpet::fsm::Stage;
use fitpet::lifecycle::{PetEvent, PetLifecycle};
use fitpet::pet::{CauseOfDeath, Emotion, Pet, Species};
use fitpet::{Error, InvalidOperation};

// ── Full life through the service ─────────────────────────────

#[test]
fn daily_care_reaches_elder_then_old_age() {
    let config = PetConfig {
        old_age_days: 45,
        ..Default::default()
    };
    let clock = StepClock::new(day(0));
    let mut store = MockStore::new();
    let mut sink = RecordingSink::default();
    let mut alerts = RecordingNotifier::default();
    let mut app = AppService::load(config, &mut store, clock.now()).unwrap();

    app.handle_reading(
        CalorieReading::Daily {
            at: clock.now(),
            kcal: 250.0,
        },
        &mut sink,
        &mut alerts,
    );
    assert!(app.handle_command(
        AppCommand::Evolve,
        clock.now(),
        &mut store,
        &mut sink,
        &mut alerts
    ));
    assert!((app.pet().total_calories_consumed - 250.0).abs() < f64::EPSILON);
    assert!((app.pet().cumulative_calories - 250.0).abs() < f64::EPSILON);

    for n in 1..=45 {
        clock.next_day();
        app.handle_command(
            AppCommand::Feed,
            clock.now(),
            &mut store,
            &mut sink,
            &mut alerts,
        );
        assert_eq!(app.pet().age, n);
        if n == 25 {
            assert_eq!(app.pet().emotion, Emotion::Happy);
        }
        app.handle_command(
            AppCommand::CheckHealth,
            clock.now(),
            &mut store,
            &mut sink,
            &mut alerts,
        );
        while app.is_ready_to_evolve() {
            app.handle_command(
                AppCommand::Evolve,
                clock.now(),
                &mut store,
                &mut sink,
                &mut alerts,
            );
        }
        if n == 40 {
            assert_eq!(app.pet().stage, Stage::Elder);
            assert!(!app.handle_command(
                AppCommand::Evolve,
                clock.now(),
                &mut store,
                &mut sink,
                &mut alerts
            ));
        }
    }

    let evolutions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Pet(PetEvent::Evolved { from, to }) => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        evolutions,
        vec![
            (Stage::Egg, Stage::Baby),
            (Stage::Baby, Stage::Child),
            (Stage::Child, Stage::Teen),
            (Stage::Teen, Stage::Adult),
            (Stage::Adult, Stage::Elder),
        ]
    );

    for streak in [7, 14, 30] {
        assert!(alerts.sent.contains(&Notification::StreakMilestone { streak }));
    }
    assert!(!alerts.categories().contains(&"neglect_warning"));
    assert!(alerts.sent.contains(&Notification::PetDied {
        cause: CauseOfDeath::OldAge,
        age: 45
    }));

    let record = app.longest_lived(&store).expect("old pet archived");
    assert_eq!(record.age, 45);
    assert_eq!(record.stage, Stage::Elder);
    assert_eq!(record.emotion, Emotion::Sleepy);
    assert_eq!(record.final_streak, 45);
    assert_eq!(record.cause, CauseOfDeath::OldAge);
    assert_eq!(record.lifespan_days(), 45);

    assert_eq!(app.pet().stage, Stage::Egg);
    assert!(!app.pet().is_dead);
}

// ── Neglect ───────────────────────────────────────────────────

#[test]
fn neglect_warns_once_per_missed_day_then_kills() {
    let mut lc = PetLifecycle::new(Pet::new(Species::Bubbles, day(0)), PetConfig::default());
    lc.update_calories(200.0, None, day(0)).unwrap();
    lc.evolve().unwrap();
    for n in 1..=8 {
        lc.feed(day(n)).unwrap();
    }
    assert_eq!(lc.pet().streak, 8);

    let warn1 = lc.check_health(day(9));
    assert_eq!(warn1.missed_days, 1);
    assert!(warn1.events.contains(&PetEvent::NeglectWarning { days_missed: 1 }));
    assert_eq!(lc.pet().streak, 0);
    assert_eq!(lc.pet().emotion, Emotion::Sad);

    let again = lc.check_health(day(9));
    assert!(again.events.is_empty());

    let warn2 = lc.check_health(day(10));
    assert!(warn2.events.contains(&PetEvent::NeglectWarning { days_missed: 2 }));

    let fatal = lc.check_health(day(11));
    assert_eq!(fatal.cause(), Some(CauseOfDeath::Neglected));
    assert_eq!(
        fatal.events.as_slice(),
        &[PetEvent::Died {
            cause: CauseOfDeath::Neglected,
            age: 8
        }]
    );
    assert_eq!(lc.pet().missed_days_count, 3);
}

#[test]
fn feeding_after_a_missed_day_recovers() {
    let mut lc = PetLifecycle::new(Pet::new(Species::Sparkle, day(0)), PetConfig::default());
    lc.feed(day(1)).unwrap();
    lc.check_health(day(3));
    assert_eq!(lc.pet().missed_days_count, 2);

    lc.feed(day(3)).unwrap();
    assert_eq!(lc.pet().missed_days_count, 0);
    assert_eq!((lc.pet().age, lc.pet().streak), (2, 1));
    assert_eq!(lc.check_health(day(3)).missed_days, 0);
}

#[test]
fn neglect_wins_over_old_age() {
    let config = PetConfig {
        old_age_days: 2,
        ..Default::default()
    };
    let mut lc = PetLifecycle::new(Pet::new(Species::Fufufafa, day(0)), config);
    lc.feed(day(1)).unwrap();
    lc.feed(day(2)).unwrap();

    let report = lc.check_health(day(5));
    assert!(report.died_from_neglect && report.died_from_old_age);
    assert_eq!(report.cause(), Some(CauseOfDeath::Neglected));
    assert_eq!(lc.pet().emotion, Emotion::Sad);
    let deaths = report
        .events
        .iter()
        .filter(|e| matches!(e, PetEvent::Died { .. }))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn dead_pet_rejects_everything() {
    let mut lc = PetLifecycle::new(Pet::new(Species::Kikimora, day(0)), PetConfig::default());
    lc.check_health(day(3));
    assert!(lc.pet().is_dead);
    let frozen = lc.pet().clone();

    let dead = Err(Error::InvalidOperation(InvalidOperation::PetDead));
    assert_eq!(lc.feed(day(4)), dead);
    assert_eq!(lc.evolve(), dead);
    assert!(lc.update_calories(500.0, None, day(4)).unwrap().is_empty());
    assert!(!lc.check_health(day(9)).died());
    assert_eq!(lc.pet(), &frozen);
}

// ── Emotion ───────────────────────────────────────────────────

#[test]
fn emotion_follows_streak_bands() {
    let bands = PetConfig::default().emotion_bands;
    let samples = [
        (0, Emotion::Sad),
        (5, Emotion::Sad),
        (6, Emotion::Content),
        (25, Emotion::Happy),
        (51, Emotion::Excited),
        (150, Emotion::Tantrum),
    ];
    for (streak, expected) in samples {
        assert_eq!(Emotion::from_streak(streak, &bands), expected, "streak {streak}");
    }
}
