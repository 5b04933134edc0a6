//! Outbound application events and user notifications.
//!
//! The [`AppService`](super::service::AppService) emits [`AppEvent`]s through
//! the [`EventSink`](super::ports::EventSink) port and [`Notification`]s
//! through the [`NotificationPort`](super::ports::NotificationPort).

use crate::fsm::Stage;
use crate::lifecycle::PetEvent;
use crate::pet::{CauseOfDeath, Emotion, Species};

use super::ports::StorageError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the loaded pet).
    Started(PetSnapshot),

    /// A domain event from the lifecycle.
    Pet(PetEvent),

    /// A fresh egg replaced a dead pet.
    NewPet(PetSnapshot),

    /// A dying pet became the new longest-lived record.
    RecordSet { age: u32, cause: CauseOfDeath },

    /// A save failed; it will be retried on the next flush.
    PersistenceFailed(StorageError),
}

/// Read-only view of the pet for the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PetSnapshot {
    pub species: Species,
    pub stage: Stage,
    pub emotion: Emotion,
    pub age: u32,
    pub streak: u32,
    pub is_dead: bool,
    pub ready_to_evolve: bool,
    pub current_day_calories: f64,
    pub cumulative_calories: f64,
    pub total_calories_consumed: f64,
    pub food_unlocked: u32,
    pub food_remaining: u32,
}

/// User-facing alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    EvolutionReady { stage: Stage },
    EvolutionCompleted { stage: Stage },
    /// Only sent while the pet can still be saved.
    NeglectWarning { days_missed: u32 },
    PetDied { cause: CauseOfDeath, age: u32 },
    StreakMilestone { streak: u32 },
    CalorieMilestone { kcal: u32, is_egg: bool },
}

impl Notification {
    /// Map a domain event to the alert the user should see, if any.
    pub fn from_pet_event(event: &PetEvent) -> Option<Self> {
        match *event {
            PetEvent::EvolutionReady { stage } => Some(Self::EvolutionReady { stage }),
            PetEvent::Evolved { to, .. } => Some(Self::EvolutionCompleted { stage: to }),
            PetEvent::NeglectWarning { days_missed } => {
                Some(Self::NeglectWarning { days_missed })
            }
            PetEvent::Died { cause, age } => Some(Self::PetDied { cause, age }),
            PetEvent::StreakMilestone { streak } => Some(Self::StreakMilestone { streak }),
            PetEvent::CalorieMilestone { kcal, is_egg } => {
                Some(Self::CalorieMilestone { kcal, is_egg })
            }
            PetEvent::Fed { .. } | PetEvent::EmotionChanged { .. } => None,
        }
    }

    /// Stable category identifier, one per notification kind.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EvolutionReady { .. } => "evolution_ready",
            Self::EvolutionCompleted { .. } => "evolution_completed",
            Self::NeglectWarning { .. } => "neglect_warning",
            Self::PetDied { .. } => "pet_died",
            Self::StreakMilestone { .. } => "streak_milestone",
            Self::CalorieMilestone { .. } => "calorie_milestone",
        }
    }
}
