//! Pet tuning parameters
//!
//! All thresholds the lifecycle and evolution rules read.
//! Values can be overridden through a [`ConfigPort`](crate::app::ports::ConfigPort)
//! (file store, in-memory store) and hot-swapped via
//! [`AppCommand::UpdateConfig`](crate::app::commands::AppCommand::UpdateConfig).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::Stage;
use crate::pet::Species;

/// Upper bound on entries in a milestone list.
pub const MAX_MILESTONES: usize = 8;

/// Sorted list of milestone values (streak days or kcal tiers).
pub type Milestones = heapless::Vec<u32, MAX_MILESTONES>;

/// Inclusive upper bounds of each emotion band, keyed on streak length.
///
/// Anything above `excited_max` is a tantrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionBands {
    pub sad_max: u32,
    pub content_max: u32,
    pub happy_max: u32,
    pub excited_max: u32,
}

impl Default for EmotionBands {
    fn default() -> Self {
        Self {
            sad_max: 5,
            content_max: 20,
            happy_max: 50,
            excited_max: 100,
        }
    }
}

/// Core pet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetConfig {
    // --- Evolution ---
    /// Incubation kcal an egg needs before it can hatch
    pub hatch_calories: f64,
    /// Minimum age (days) for Baby -> Child
    pub baby_evolve_age: u32,
    /// Minimum age (days) for Child -> Teen
    pub child_evolve_age: u32,
    /// Minimum age (days) for Teen -> Adult
    pub teen_evolve_age: u32,
    /// Minimum age (days) for Adult -> Elder
    pub adult_evolve_age: u32,

    // --- Emotion ---
    pub emotion_bands: EmotionBands,

    // --- Health ---
    /// Consecutive unfed days that kill the pet
    pub neglect_death_days: u32,
    /// Age (days) at which the pet dies of old age
    pub old_age_days: u32,

    // --- Food ---
    /// kcal burned per unlocked food item
    pub kcal_per_food: f64,
    /// Daily cap on unlocked food items
    pub max_food_per_day: u32,

    // --- Notifications ---
    pub streak_milestones: Milestones,
    /// Incubation kcal tiers announced while the pet is an egg
    pub egg_calorie_milestones: Milestones,
    /// Daily kcal tiers announced after hatching
    pub calorie_milestones: Milestones,

    // --- New pets ---
    pub default_species: Species,

    // --- Timing ---
    /// How often the host should poll the activity provider (seconds)
    pub calorie_poll_interval_secs: u32,
}

impl PetConfig {
    /// Age threshold that gates leaving `stage`, if that stage is age-gated.
    pub fn evolve_age(&self, stage: Stage) -> Option<u32> {
        match stage {
            Stage::Baby => Some(self.baby_evolve_age),
            Stage::Child => Some(self.child_evolve_age),
            Stage::Teen => Some(self.teen_evolve_age),
            Stage::Adult => Some(self.adult_evolve_age),
            Stage::Egg | Stage::Elder => None,
        }
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=10_000.0).contains(&self.hatch_calories) {
            return Err(ConfigError::ValidationFailed(
                "hatch_calories must be 1.0–10000.0",
            ));
        }
        if self.baby_evolve_age == 0 {
            return Err(ConfigError::ValidationFailed(
                "baby_evolve_age must be at least 1",
            ));
        }
        let ages = [
            self.baby_evolve_age,
            self.child_evolve_age,
            self.teen_evolve_age,
            self.adult_evolve_age,
            self.old_age_days,
        ];
        if ages.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationFailed(
                "evolution ages and old_age_days must be strictly increasing",
            ));
        }
        let b = &self.emotion_bands;
        if !(b.sad_max < b.content_max
            && b.content_max < b.happy_max
            && b.happy_max < b.excited_max)
        {
            return Err(ConfigError::ValidationFailed(
                "emotion band bounds must be strictly increasing",
            ));
        }
        if !(1..=30).contains(&self.neglect_death_days) {
            return Err(ConfigError::ValidationFailed(
                "neglect_death_days must be 1–30",
            ));
        }
        if !(1.0..=5_000.0).contains(&self.kcal_per_food) {
            return Err(ConfigError::ValidationFailed(
                "kcal_per_food must be 1.0–5000.0",
            ));
        }
        if !(1..=10).contains(&self.max_food_per_day) {
            return Err(ConfigError::ValidationFailed(
                "max_food_per_day must be 1–10",
            ));
        }
        for list in [
            &self.streak_milestones,
            &self.egg_calorie_milestones,
            &self.calorie_milestones,
        ] {
            if list.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ConfigError::ValidationFailed(
                    "milestones must be strictly increasing",
                ));
            }
        }
        if !(10..=3600).contains(&self.calorie_poll_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "calorie_poll_interval_secs must be 10–3600",
            ));
        }
        Ok(())
    }
}

fn milestones(values: &[u32]) -> Milestones {
    values.iter().copied().take(MAX_MILESTONES).collect()
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            // Evolution
            hatch_calories: 200.0,
            baby_evolve_age: 7,
            child_evolve_age: 15,
            teen_evolve_age: 25,
            adult_evolve_age: 40,

            emotion_bands: EmotionBands::default(),

            // Health
            neglect_death_days: 3,
            old_age_days: 1000,

            // Food
            kcal_per_food: 200.0,
            max_food_per_day: 3,

            // Notifications
            streak_milestones: milestones(&[7, 14, 30, 50, 100, 200, 365]),
            egg_calorie_milestones: milestones(&[100, 200]),
            calorie_milestones: milestones(&[200, 400, 600]),

            default_species: Species::Fufufafa,

            calorie_poll_interval_secs: 300, // 5 min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        assert!(PetConfig::default().validate().is_ok());
    }

    #[test]
    fn evolve_age_only_for_age_gated_stages() {
        let c = PetConfig::default();
        assert_eq!(c.evolve_age(Stage::Egg), None);
        assert_eq!(c.evolve_age(Stage::Baby), Some(7));
        assert_eq!(c.evolve_age(Stage::Adult), Some(40));
        assert_eq!(c.evolve_age(Stage::Elder), None);
    }

    #[test]
    fn rejects_non_increasing_ages() {
        let cfg = PetConfig {
            child_evolve_age: 7,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn rejects_old_age_before_adulthood() {
        let cfg = PetConfig {
            old_age_days: 30,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_overlapping_emotion_bands() {
        let cfg = PetConfig {
            emotion_bands: EmotionBands {
                sad_max: 20,
                content_max: 20,
                happy_max: 50,
                excited_max: 100,
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unsorted_milestones() {
        let cfg = PetConfig {
            calorie_milestones: milestones(&[400, 200]),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let c = PetConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: PetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = PetConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: PetConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.streak_milestones, c2.streak_milestones);
        assert!((c.hatch_calories - c2.hatch_calories).abs() < f64::EPSILON);
    }
}
