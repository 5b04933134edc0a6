//! Concrete stage rows and the table builder.
//!
//! ```text
//!  EGG ──[incubation kcal ≥ hatch]──▶ BABY ──[age ≥ 7]──▶ CHILD
//!                                                          │
//!                                                     [age ≥ 15]
//!                                                          ▼
//!  ELDER ◀──[age ≥ 40]── ADULT ◀──────[age ≥ 25]──────── TEEN
//! ```
//!
//! Thresholds come from [`PetConfig`]; the numbers above are the defaults.

use log::info;

use super::{Stage, StageDescriptor};
use crate::config::PetConfig;
use crate::pet::Pet;

/// Build the static stage table.  Row order matches `Stage as usize`.
pub fn build_stage_table() -> [StageDescriptor; Stage::COUNT] {
    [
        StageDescriptor {
            stage: Stage::Egg,
            name: "EGG",
            is_ready: egg_ready,
            on_enter: None,
            on_exit: Some(egg_exit),
        },
        StageDescriptor {
            stage: Stage::Baby,
            name: "BABY",
            is_ready: age_ready,
            on_enter: Some(baby_enter),
            on_exit: None,
        },
        StageDescriptor {
            stage: Stage::Child,
            name: "CHILD",
            is_ready: age_ready,
            on_enter: Some(grown_enter),
            on_exit: None,
        },
        StageDescriptor {
            stage: Stage::Teen,
            name: "TEEN",
            is_ready: age_ready,
            on_enter: Some(grown_enter),
            on_exit: None,
        },
        StageDescriptor {
            stage: Stage::Adult,
            name: "ADULT",
            is_ready: age_ready,
            on_enter: Some(grown_enter),
            on_exit: None,
        },
        StageDescriptor {
            stage: Stage::Elder,
            name: "ELDER",
            is_ready: never_ready,
            on_enter: Some(elder_enter),
            on_exit: None,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Readiness
// ═══════════════════════════════════════════════════════════════════════════

/// Eggs hatch on incubation progress: the multi-day sum since creation.
fn egg_ready(pet: &Pet, config: &PetConfig) -> bool {
    pet.cumulative_calories >= config.hatch_calories
}

fn age_ready(pet: &Pet, config: &PetConfig) -> bool {
    config
        .evolve_age(pet.stage)
        .is_some_and(|min_age| pet.age >= min_age)
}

fn never_ready(_pet: &Pet, _config: &PetConfig) -> bool {
    false
}

// ═══════════════════════════════════════════════════════════════════════════
//  Actions
// ═══════════════════════════════════════════════════════════════════════════

fn egg_exit(pet: &mut Pet) {
    info!(
        "EGG: hatching after {:.0} kcal of incubation",
        pet.cumulative_calories
    );
}

// One-time transfer.  cumulative_calories is left as-is; the next daily
// reset turns it into the non-egg gauge.
fn baby_enter(pet: &mut Pet) {
    pet.total_calories_consumed += pet.cumulative_calories;
    info!(
        "BABY: {} hatched, lifetime consumption {:.0} kcal",
        pet.species.name(),
        pet.total_calories_consumed
    );
}

fn grown_enter(pet: &mut Pet) {
    info!("{}: reached at age {}", pet.stage.name(), pet.age);
}

fn elder_enter(pet: &mut Pet) {
    info!("ELDER: final stage reached at age {}", pet.age);
}
