//! Inbound commands to the application service.
//!
//! These are the actions a UI (or the simulator) can request.  The
//! [`AppService`](super::service::AppService) applies them to the active pet.

use crate::config::PetConfig;

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Feed the pet now.
    Feed,

    /// Evolve if ready.
    Evolve,

    /// Run neglect and old-age checks (app foreground, day change).
    CheckHealth,

    /// Hot-swap thresholds.  Rejected if the config fails validation.
    UpdateConfig(PetConfig),

    /// Skip the readiness check (development builds only).
    #[cfg(any(debug_assertions, feature = "debug-tools"))]
    ForceEvolve,
}
