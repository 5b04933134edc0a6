//! Function-pointer stage machine for pet evolution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StageTable                                                │
//! │  ┌────────┬─────────────────────┬───────────┬──────────┐   │
//! │  │ Stage  │ is_ready            │ on_enter  │ on_exit  │   │
//! │  ├────────┼─────────────────────┼───────────┼──────────┤   │
//! │  │ Egg    │ fn(pet,cfg) -> bool │           │ fn(pet)  │   │
//! │  │ Baby   │ fn(pet,cfg) -> bool │ fn(pet)   │          │   │
//! │  │ Child  │ fn(pet,cfg) -> bool │ fn(pet)   │          │   │
//! │  │ Teen   │ fn(pet,cfg) -> bool │ fn(pet)   │          │   │
//! │  │ Adult  │ fn(pet,cfg) -> bool │ fn(pet)   │          │   │
//! │  │ Elder  │ never               │ fn(pet)   │          │   │
//! │  └────────┴─────────────────────┴───────────┴──────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a ticking FSM nothing here advances on its own.  The only way
//! forward is an explicit [`EvolutionPolicy::evolve`], which checks the
//! current row's `is_ready`, runs `on_exit` / `on_enter`, and moves the
//! pet exactly one stage.  There is no way back.

pub mod stages;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::PetConfig;
use crate::error::InvalidOperation;
use crate::pet::{Emotion, Pet};

// ---------------------------------------------------------------------------
// Stage identity
// ---------------------------------------------------------------------------

/// Life stages in evolution order.
/// Must stay in sync with the table built in [`stages::build_stage_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    Egg = 0,
    Baby = 1,
    Child = 2,
    Teen = 3,
    Adult = 4,
    Elder = 5,
}

impl Stage {
    pub const COUNT: usize = 6;

    /// Convert a table index back to `Stage`.  Asserts in debug builds;
    /// returns `Elder` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Egg,
            1 => Self::Baby,
            2 => Self::Child,
            3 => Self::Teen,
            4 => Self::Adult,
            5 => Self::Elder,
            _ => {
                debug_assert!(false, "invalid stage index: {idx}");
                Self::Elder
            }
        }
    }

    /// The following stage, or `None` for Elder.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Egg => Some(Self::Baby),
            Self::Baby => Some(Self::Child),
            Self::Child => Some(Self::Teen),
            Self::Teen => Some(Self::Adult),
            Self::Adult => Some(Self::Elder),
            Self::Elder => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Egg => "EGG",
            Self::Baby => "BABY",
            Self::Child => "CHILD",
            Self::Teen => "TEEN",
            Self::Adult => "ADULT",
            Self::Elder => "ELDER",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Readiness predicate for leaving a stage.
pub type ReadinessFn = fn(&Pet, &PetConfig) -> bool;

/// Signature for `on_enter` and `on_exit` actions.
pub type StageActionFn = fn(&mut Pet);

/// Static descriptor for a single stage.
pub struct StageDescriptor {
    pub stage: Stage,
    pub name: &'static str,
    pub is_ready: ReadinessFn,
    pub on_enter: Option<StageActionFn>,
    pub on_exit: Option<StageActionFn>,
}

/// One completed evolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
}

// ---------------------------------------------------------------------------
// Policy engine
// ---------------------------------------------------------------------------

/// Owns the stage table and applies evolution to a borrowed pet.
///
/// Holds no pet state of its own, so one policy can serve any pet.
pub struct EvolutionPolicy {
    table: [StageDescriptor; Stage::COUNT],
}

impl EvolutionPolicy {
    pub fn new(table: [StageDescriptor; Stage::COUNT]) -> Self {
        Self { table }
    }

    /// Policy built from the standard stage table.
    pub fn standard() -> Self {
        Self::new(stages::build_stage_table())
    }

    pub fn descriptor(&self, stage: Stage) -> &StageDescriptor {
        &self.table[stage as usize]
    }

    /// Whether `pet` currently meets the threshold for leaving its stage.
    /// Always false for a dead pet.
    pub fn is_ready_to_evolve(&self, pet: &Pet, config: &PetConfig) -> bool {
        !pet.is_dead && (self.descriptor(pet.stage).is_ready)(pet, config)
    }

    /// Advance `pet` one stage.  Rejected (and `pet` untouched) when dead,
    /// already Elder, or not yet ready.
    pub fn evolve(
        &self,
        pet: &mut Pet,
        config: &PetConfig,
    ) -> Result<Transition, InvalidOperation> {
        if pet.is_dead {
            return Err(InvalidOperation::PetDead);
        }
        let Some(next) = pet.stage.next() else {
            return Err(InvalidOperation::FinalStage);
        };
        if !(self.descriptor(pet.stage).is_ready)(pet, config) {
            return Err(InvalidOperation::NotReady(pet.stage));
        }
        Ok(self.advance(pet, next, config))
    }

    /// Development shortcut: lift the pet to the current stage's threshold
    /// (age, or incubation kcal for an egg) and advance.  A forced hatch
    /// credits only the kcal actually incubated to lifetime consumption.
    #[cfg(any(debug_assertions, feature = "debug-tools"))]
    pub fn force_evolve(
        &self,
        pet: &mut Pet,
        config: &PetConfig,
    ) -> Result<Transition, InvalidOperation> {
        if pet.is_dead {
            return Err(InvalidOperation::PetDead);
        }
        let Some(next) = pet.stage.next() else {
            return Err(InvalidOperation::FinalStage);
        };
        info!("Force-evolving {}", pet.stage.name());
        if pet.stage == Stage::Egg {
            let incubated = pet.cumulative_calories;
            pet.cumulative_calories = incubated.max(config.hatch_calories);
            let transition = self.advance(pet, next, config);
            pet.total_calories_consumed -= pet.cumulative_calories - incubated;
            pet.cumulative_calories = incubated;
            return Ok(transition);
        }
        if let Some(min_age) = config.evolve_age(pet.stage) {
            pet.age = pet.age.max(min_age);
        }
        Ok(self.advance(pet, next, config))
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn advance(&self, pet: &mut Pet, next: Stage, config: &PetConfig) -> Transition {
        let from = pet.stage;
        info!(
            "Evolution: {} -> {}",
            self.descriptor(from).name,
            self.descriptor(next).name
        );

        if let Some(exit) = self.descriptor(from).on_exit {
            exit(pet);
        }
        pet.stage = next;
        if let Some(enter) = self.descriptor(next).on_enter {
            enter(pet);
        }

        pet.emotion = Emotion::from_streak(pet.streak, &config.emotion_bands);
        Transition { from, to: next }
    }
}

impl Default for EvolutionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
