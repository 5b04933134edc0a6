//! The pet record and its small value types.
//!
//! `Pet` is plain data: every rule that changes it lives in
//! [`lifecycle`](crate::lifecycle) and [`fsm`](crate::fsm).  Dates are
//! calendar dates (`NaiveDate`) wherever a rule only cares about "which day".

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::{EmotionBands, PetConfig};
use crate::fsm::Stage;

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// Cosmetic species, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Species {
    #[default]
    Fufufafa,
    Kikimora,
    Bubbles,
    Sparkle,
}

impl Species {
    pub fn name(self) -> &'static str {
        match self {
            Self::Fufufafa => "FUFUFAFA",
            Self::Kikimora => "KIKIMORA",
            Self::Bubbles => "BUBBLES",
            Self::Sparkle => "SPARKLE",
        }
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Excited,
    Sleepy,
    Tantrum,
    Content,
}

impl Emotion {
    /// Map a streak onto its emotion band.  Total over `u32`.
    pub fn from_streak(streak: u32, bands: &EmotionBands) -> Self {
        if streak <= bands.sad_max {
            Self::Sad
        } else if streak <= bands.content_max {
            Self::Content
        } else if streak <= bands.happy_max {
            Self::Happy
        } else if streak <= bands.excited_max {
            Self::Excited
        } else {
            Self::Tantrum
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Happy => "HAPPY",
            Self::Sad => "SAD",
            Self::Angry => "ANGRY",
            Self::Excited => "EXCITED",
            Self::Sleepy => "SLEEPY",
            Self::Tantrum => "TANTRUM",
            Self::Content => "CONTENT",
        }
    }
}

// ---------------------------------------------------------------------------
// Cause of death
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CauseOfDeath {
    Neglected,
    OldAge,
    Unknown,
}

impl CauseOfDeath {
    /// Stable identifier used in persisted records and notifications.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neglected => "neglected",
            Self::OldAge => "old_age",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CauseOfDeath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pet
// ---------------------------------------------------------------------------

/// A single pet and all of its counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Days alive, credited once per fed day.
    pub age: u32,
    /// Consecutive fed days.
    pub streak: u32,
    pub species: Species,
    pub stage: Stage,
    pub emotion: Emotion,

    /// Calendar day of the last feed that credited age/streak.
    pub last_fed_date: NaiveDate,
    /// Egg: incubation sum since creation.  Otherwise: today's burn only.
    pub cumulative_calories: f64,
    /// Calendar day the calorie gauge last rolled over.
    pub last_calorie_reset_date: NaiveDate,
    /// Most recent daily value reported by the activity source.
    pub current_day_calories: f64,
    /// Lifetime consumption; grows only at hatching.
    pub total_calories_consumed: f64,

    pub current_day_feed_count: u32,
    pub last_feed_reset_date: NaiveDate,
    pub missed_days_count: u32,

    pub is_dead: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Pet {
    /// A fresh, active egg created at `now`.
    pub fn new(species: Species, now: NaiveDateTime) -> Self {
        let today = now.date();
        Self {
            age: 0,
            streak: 0,
            species,
            stage: Stage::Egg,
            emotion: Emotion::Content,
            last_fed_date: today,
            cumulative_calories: 0.0,
            last_calorie_reset_date: today,
            current_day_calories: 0.0,
            total_calories_consumed: 0.0,
            current_day_feed_count: 0,
            last_feed_reset_date: today,
            missed_days_count: 0,
            is_dead: false,
            is_active: true,
            created_at: now,
        }
    }

    /// Whole calendar days between the last crediting feed and `today`.
    /// A clock that went backwards counts as zero.
    pub fn days_since_fed(&self, today: NaiveDate) -> u32 {
        (today - self.last_fed_date).num_days().max(0) as u32
    }

    /// Feed interactions recorded on `today`.
    pub fn feed_count_on(&self, today: NaiveDate) -> u32 {
        if self.last_feed_reset_date == today {
            self.current_day_feed_count
        } else {
            0
        }
    }

    /// Food items unlocked by today's burn.  Eggs don't eat.
    pub fn food_unlocked(&self, config: &PetConfig) -> u32 {
        if self.stage == Stage::Egg {
            return 0;
        }
        let items = (self.current_day_calories / config.kcal_per_food).floor();
        (items.max(0.0) as u32).min(config.max_food_per_day)
    }

    /// Unlocked food not yet fed today.
    pub fn food_remaining(&self, config: &PetConfig, today: NaiveDate) -> u32 {
        self.food_unlocked(config)
            .saturating_sub(self.feed_count_on(today))
    }
}
