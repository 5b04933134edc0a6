//! Notification adapter that writes alerts to the log.
//!
//! [`render`] turns a [`Notification`] into the title/body pair a real push
//! backend would deliver.  [`LogNotifier`] just prints it.

use log::{info, warn};

use crate::app::events::Notification;
use crate::app::ports::NotificationPort;
use crate::pet::CauseOfDeath;

/// User-facing text for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub title: &'static str,
    pub body: String,
}

pub fn render(notification: &Notification) -> Rendered {
    match *notification {
        Notification::EvolutionReady { stage } => Rendered {
            title: "Ready to evolve",
            body: format!(
                "Your {} is ready for the next stage. Open the app to evolve!",
                stage.name().to_lowercase()
            ),
        },
        Notification::EvolutionCompleted { stage } => Rendered {
            title: "Evolution complete",
            body: format!("Your pet is now {}.", stage.name().to_lowercase()),
        },
        Notification::NeglectWarning { days_missed } => Rendered {
            title: "Your pet is hungry",
            body: if days_missed <= 1 {
                "A whole day without food. Time for a meal!".to_owned()
            } else {
                format!("{days_missed} days without food. Feed your pet before it's too late.")
            },
        },
        Notification::PetDied { cause, age } => Rendered {
            title: "Your pet has passed away",
            body: match cause {
                CauseOfDeath::Neglected => format!(
                    "Left unfed for too long, your pet died at {age} days. A new egg is waiting."
                ),
                CauseOfDeath::OldAge | CauseOfDeath::Unknown => format!(
                    "After {age} days together, your pet has gone to rest. A new egg is waiting."
                ),
            },
        },
        Notification::StreakMilestone { streak } => Rendered {
            title: "Streak milestone",
            body: format!("{streak} days in a row! Your pet is thriving."),
        },
        Notification::CalorieMilestone { kcal, is_egg: true } => Rendered {
            title: "Incubation progress",
            body: format!("{kcal} kcal burned towards hatching your egg."),
        },
        Notification::CalorieMilestone { kcal, is_egg: false } => Rendered {
            title: "Food unlocked",
            body: format!("{kcal} kcal burned today. Your pet has food waiting!"),
        },
    }
}

/// [`NotificationPort`] that logs each alert and counts them.
#[derive(Debug, Default)]
pub struct LogNotifier {
    sent: usize,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl NotificationPort for LogNotifier {
    fn notify(&mut self, notification: &Notification) {
        let r = render(notification);
        self.sent += 1;
        match notification {
            Notification::NeglectWarning { .. } | Notification::PetDied { .. } => {
                warn!("NOTIFY[{}] {}: {}", notification.category(), r.title, r.body);
            }
            _ => info!("NOTIFY[{}] {}: {}", notification.category(), r.title, r.body),
        }
    }
}
