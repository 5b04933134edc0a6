//! Pet lifecycle: the rules that move one pet through time.
//!
//! [`PetLifecycle`] owns the active [`Pet`], its [`PetConfig`] and the
//! [`EvolutionPolicy`].  Every operation mutates the pet in place and hands
//! back the domain events it produced; nothing here performs I/O.  The
//! caller decides what to persist and who to tell.
//!
//! Once `is_dead` is set the pet is frozen: `feed` and `evolve` are rejected,
//! `update_calories` and `check_health` become no-ops.

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use crate::app::events::PetSnapshot;
use crate::config::PetConfig;
use crate::error::{Error, InvalidOperation, Result};
use crate::fsm::{EvolutionPolicy, Stage, Transition};
use crate::pet::{CauseOfDeath, Emotion, Pet};

/// Upper bound on events produced by a single operation.
pub const MAX_EVENTS: usize = 8;

pub type Events = heapless::Vec<PetEvent, MAX_EVENTS>;

// ---------------------------------------------------------------------------
// Domain events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PetEvent {
    /// A feed was accepted.  `credited` is true when it counted as a new day.
    Fed { age: u32, streak: u32, credited: bool },
    EmotionChanged { from: Emotion, to: Emotion },
    /// The pet just became ready to leave `stage`.
    EvolutionReady { stage: Stage },
    Evolved { from: Stage, to: Stage },
    NeglectWarning { days_missed: u32 },
    Died { cause: CauseOfDeath, age: u32 },
    StreakMilestone { streak: u32 },
    CalorieMilestone { kcal: u32, is_egg: bool },
}

/// Events produced by `feed`, `update_calories` or `evolve`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub events: Events,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn push(&mut self, event: PetEvent) {
        push_event(&mut self.events, event);
    }
}

/// Result of a health check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthReport {
    pub died_from_neglect: bool,
    pub died_from_old_age: bool,
    /// Whole days since the last crediting feed (0 if fed today).
    pub missed_days: u32,
    pub events: Events,
}

impl HealthReport {
    /// Cause to archive, if this check killed the pet.  Neglect wins ties.
    pub fn cause(&self) -> Option<CauseOfDeath> {
        if self.died_from_neglect {
            Some(CauseOfDeath::Neglected)
        } else if self.died_from_old_age {
            Some(CauseOfDeath::OldAge)
        } else {
            None
        }
    }

    pub fn died(&self) -> bool {
        self.died_from_neglect || self.died_from_old_age
    }
}

fn push_event(events: &mut Events, event: PetEvent) {
    if events.push(event).is_err() {
        warn!("Event buffer full, dropping {event:?}");
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

pub struct PetLifecycle {
    pet: Pet,
    config: PetConfig,
    policy: EvolutionPolicy,
}

impl PetLifecycle {
    pub fn new(pet: Pet, config: PetConfig) -> Self {
        Self {
            pet,
            config,
            policy: EvolutionPolicy::standard(),
        }
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub(crate) fn pet_mut(&mut self) -> &mut Pet {
        &mut self.pet
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    /// Swap in new thresholds.  Takes effect on the next operation; an
    /// invalid config is rejected and the current one kept.
    pub fn set_config(&mut self, config: PetConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Replace the active pet (respawn after death, reload from storage).
    pub fn replace_pet(&mut self, pet: Pet) -> Pet {
        core::mem::replace(&mut self.pet, pet)
    }

    pub fn is_ready_to_evolve(&self) -> bool {
        self.policy.is_ready_to_evolve(&self.pet, &self.config)
    }

    // -----------------------------------------------------------------------
    // Feeding
    // -----------------------------------------------------------------------

    /// Feed the pet at `now`.  The first feed on a calendar day credits one
    /// day of age and streak; later feeds that day only bump the feed count.
    pub fn feed(&mut self, now: NaiveDateTime) -> Result<Outcome> {
        if self.pet.is_dead {
            return Err(InvalidOperation::PetDead.into());
        }
        let today = now.date();
        let was_ready = self.is_ready_to_evolve();
        let mut out = Outcome::default();

        let credited = self.pet.last_fed_date != today;
        if credited {
            self.pet.age = self.pet.age.saturating_add(1);
            self.pet.streak = self.pet.streak.saturating_add(1);
            self.pet.last_fed_date = today;
            self.pet.missed_days_count = 0;
        }

        if self.pet.last_feed_reset_date != today {
            self.pet.current_day_feed_count = 0;
            self.pet.last_feed_reset_date = today;
        }
        self.pet.current_day_feed_count = self.pet.current_day_feed_count.saturating_add(1);

        self.refresh_emotion(&mut out.events);
        out.push(PetEvent::Fed {
            age: self.pet.age,
            streak: self.pet.streak,
            credited,
        });
        if credited && self.config.streak_milestones.contains(&self.pet.streak) {
            info!("Streak milestone: {} days", self.pet.streak);
            out.push(PetEvent::StreakMilestone {
                streak: self.pet.streak,
            });
        }
        self.push_readiness(was_ready, &mut out.events);

        debug!(
            "Fed: age={} streak={} feeds_today={}",
            self.pet.age, self.pet.streak, self.pet.current_day_feed_count
        );
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Calories
    // -----------------------------------------------------------------------

    /// Merge a daily calorie reading.
    ///
    /// `external_cumulative` is the authoritative incubation sum since the
    /// pet was created; it only matters while the pet is an egg.  Safe to
    /// call repeatedly with the same values.  A reading dated before the
    /// day the gauge last rolled over is rejected as stale.
    pub fn update_calories(
        &mut self,
        today_kcal: f64,
        external_cumulative: Option<f64>,
        now: NaiveDateTime,
    ) -> Result<Outcome> {
        if !today_kcal.is_finite() || today_kcal < 0.0 {
            return Err(Error::DataUnavailable("daily calories out of range"));
        }
        if external_cumulative.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(Error::DataUnavailable("cumulative calories out of range"));
        }
        if self.pet.is_dead {
            return Ok(Outcome::default());
        }

        let today = now.date();
        if today < self.pet.last_calorie_reset_date {
            return Err(Error::DataUnavailable("stale reading"));
        }
        let is_egg = self.pet.stage == Stage::Egg;
        let was_ready = self.is_ready_to_evolve();
        let prev_day = self.pet.current_day_calories;
        let prev_cumulative = self.pet.cumulative_calories;

        let rolled_over = self.pet.last_calorie_reset_date != today;
        if rolled_over {
            if !is_egg {
                self.pet.cumulative_calories = 0.0;
            }
            self.pet.last_calorie_reset_date = today;
            debug!("Calorie gauge rolled over to {today}");
        }

        self.pet.current_day_calories = today_kcal;

        let prev_metric;
        let new_metric;
        if is_egg {
            self.pet.cumulative_calories = match external_cumulative {
                Some(total) => total,
                None => {
                    let base = if rolled_over {
                        prev_cumulative
                    } else {
                        (prev_cumulative - prev_day).max(0.0)
                    };
                    base + today_kcal
                }
            };
            prev_metric = prev_cumulative;
            new_metric = self.pet.cumulative_calories;
        } else {
            self.pet.cumulative_calories = today_kcal;
            prev_metric = if rolled_over { 0.0 } else { prev_day };
            new_metric = today_kcal;
        }

        let mut out = Outcome::default();
        let tiers = if is_egg {
            &self.config.egg_calorie_milestones
        } else {
            &self.config.calorie_milestones
        };
        if let Some(&kcal) = tiers
            .iter()
            .filter(|&&t| prev_metric < f64::from(t) && new_metric >= f64::from(t))
            .max()
        {
            info!("Calorie milestone: {kcal} kcal (egg={is_egg})");
            out.push(PetEvent::CalorieMilestone { kcal, is_egg });
        }
        self.push_readiness(was_ready, &mut out.events);
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Health
    // -----------------------------------------------------------------------

    /// Apply neglect and old-age rules as of `now`.
    pub fn check_health(&mut self, now: NaiveDateTime) -> HealthReport {
        let mut report = HealthReport::default();
        if self.pet.is_dead {
            return report;
        }

        let days = self.pet.days_since_fed(now.date());
        report.missed_days = days;
        let mut warning = None;

        if days > 0 {
            let previously_missed = self.pet.missed_days_count;
            self.pet.missed_days_count = days;

            if days >= self.config.neglect_death_days {
                warn!("Pet died of neglect after {days} missed days");
                self.pet.is_dead = true;
                self.pet.emotion = Emotion::Sad;
                report.died_from_neglect = true;
            } else {
                self.pet.streak = 0;
                self.refresh_emotion(&mut report.events);
                if previously_missed != days {
                    warning = Some(PetEvent::NeglectWarning { days_missed: days });
                }
            }
        }

        if self.pet.age >= self.config.old_age_days {
            report.died_from_old_age = true;
            if !report.died_from_neglect {
                info!("Pet died of old age at {} days", self.pet.age);
                self.pet.is_dead = true;
                self.pet.emotion = Emotion::Sleepy;
            }
        }

        // A pet that just died gets no hunger warning.
        if let Some(event) = warning.filter(|_| !report.died()) {
            info!("Neglect warning: {days} day(s) missed");
            push_event(&mut report.events, event);
        }
        if let Some(cause) = report.cause() {
            push_event(
                &mut report.events,
                PetEvent::Died {
                    cause,
                    age: self.pet.age,
                },
            );
        }
        report
    }

    // -----------------------------------------------------------------------
    // Evolution
    // -----------------------------------------------------------------------

    pub fn evolve(&mut self) -> Result<Outcome> {
        let transition = self.policy.evolve(&mut self.pet, &self.config)?;
        Ok(self.evolved(transition))
    }

    #[cfg(any(debug_assertions, feature = "debug-tools"))]
    pub fn force_evolve(&mut self) -> Result<Outcome> {
        let transition = self.policy.force_evolve(&mut self.pet, &self.config)?;
        Ok(self.evolved(transition))
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self, today: NaiveDate) -> PetSnapshot {
        PetSnapshot {
            species: self.pet.species,
            stage: self.pet.stage,
            emotion: self.pet.emotion,
            age: self.pet.age,
            streak: self.pet.streak,
            is_dead: self.pet.is_dead,
            ready_to_evolve: self.is_ready_to_evolve(),
            current_day_calories: self.pet.current_day_calories,
            cumulative_calories: self.pet.cumulative_calories,
            total_calories_consumed: self.pet.total_calories_consumed,
            food_unlocked: self.pet.food_unlocked(&self.config),
            food_remaining: self.pet.food_remaining(&self.config, today),
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn evolved(&self, t: Transition) -> Outcome {
        let mut out = Outcome::default();
        out.push(PetEvent::Evolved {
            from: t.from,
            to: t.to,
        });
        // Already past the next threshold (e.g. an old pet that skipped evolving).
        if self.is_ready_to_evolve() {
            out.push(PetEvent::EvolutionReady { stage: self.pet.stage });
        }
        out
    }

    fn refresh_emotion(&mut self, events: &mut Events) {
        let from = self.pet.emotion;
        let to = Emotion::from_streak(self.pet.streak, &self.config.emotion_bands);
        if from != to {
            self.pet.emotion = to;
            push_event(events, PetEvent::EmotionChanged { from, to });
        }
    }

    fn push_readiness(&self, was_ready: bool, events: &mut Events) {
        if !was_ready && self.is_ready_to_evolve() {
            info!("{} is ready to evolve", self.pet.stage.name());
            push_event(events, PetEvent::EvolutionReady { stage: self.pet.stage });
        }
    }
}
