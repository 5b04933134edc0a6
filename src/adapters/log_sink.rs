//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per
//! [`AppEvent`] through the `log` facade.  A UI layer would implement the
//! same trait and redraw instead.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::lifecycle::PetEvent;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) | AppEvent::NewPet(s) => {
                let tag = if matches!(event, AppEvent::Started(_)) {
                    "START"
                } else {
                    "NEW  "
                };
                info!(
                    "{tag} | {} {} | age={} streak={} | mood={} | \
                     kcal today={:.0} cumulative={:.0} lifetime={:.0} | food {}/{}{}",
                    s.species.name(),
                    s.stage.name(),
                    s.age,
                    s.streak,
                    s.emotion.name(),
                    s.current_day_calories,
                    s.cumulative_calories,
                    s.total_calories_consumed,
                    s.food_remaining,
                    s.food_unlocked,
                    if s.ready_to_evolve { " | READY" } else { "" },
                );
            }
            AppEvent::Pet(e) => log_pet_event(e),
            AppEvent::RecordSet { age, cause } => {
                info!("RECORD| new longest-lived: {age} days ({cause})");
            }
            AppEvent::PersistenceFailed(e) => {
                warn!("STORE | save failed: {e}, will retry");
            }
        }
    }
}

fn log_pet_event(event: &PetEvent) {
    match *event {
        PetEvent::Fed { age, streak, credited } => {
            info!("FEED  | age={age} streak={streak} credited={credited}");
        }
        PetEvent::EmotionChanged { from, to } => {
            info!("MOOD  | {} -> {}", from.name(), to.name());
        }
        PetEvent::EvolutionReady { stage } => {
            info!("READY | {} can evolve", stage.name());
        }
        PetEvent::Evolved { from, to } => {
            info!("EVOLVE| {} -> {}", from.name(), to.name());
        }
        PetEvent::NeglectWarning { days_missed } => {
            warn!("HEALTH| {days_missed} day(s) without food");
        }
        PetEvent::Died { cause, age } => {
            warn!("DEATH | cause={cause} age={age}");
        }
        PetEvent::StreakMilestone { streak } => {
            info!("STREAK| {streak} days");
        }
        PetEvent::CalorieMilestone { kcal, is_egg } => {
            info!("KCAL  | {kcal} kcal reached (egg={is_egg})");
        }
    }
}
