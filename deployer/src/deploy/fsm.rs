//! Finite State Machine for tracking an app rollout

use std::time::Duration;

use crate::errors::DeployError;
use crate::models::deployment::{DeploymentOutcome, DeploymentProgress, RemoteApplication};

/// FSM settings
#[derive(Debug, Clone)]
pub struct FsmSettings {
    /// Time between two polls
    pub poll_interval: Duration,

    /// Total time allowed for the rollout
    pub deployment_timeout: Duration,
}

impl Default for FsmSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            deployment_timeout: Duration::from_secs(1800),
        }
    }
}

impl FsmSettings {
    /// A zero interval never advances the clock, so the deadline would never be reached
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.poll_interval.is_zero() {
            return Err(DeployError::ConfigError(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rollout state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// The platform has not started a deployment for the app yet
    AwaitingDeploymentId,

    /// Watching the progress counters of a deployment
    Polling { deployment_id: String },

    /// All steps succeeded; the converged app still has to be read
    Converging { deployment_id: String },

    /// Rolled out
    Succeeded(RemoteApplication),

    /// The platform reported failed steps
    Failed(String),

    /// Deadline passed before a terminal state
    TimedOut,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Succeeded(_) | PollState::Failed(_) | PollState::TimedOut
        )
    }
}

/// Rollout event
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// The poll interval elapsed
    Tick,

    /// The app was read while waiting for a deployment
    AppObserved(RemoteApplication),

    /// Progress counters were read
    ProgressObserved(DeploymentProgress),

    /// The app was re-read after all steps succeeded
    Converged(RemoteApplication),
}

/// Rollout FSM
#[derive(Debug, Clone)]
pub struct DeploymentFsm {
    app_id: String,
    settings: FsmSettings,
    state: PollState,
    elapsed: Duration,
    ticks: u32,
}

impl DeploymentFsm {
    /// Create a new FSM waiting for the app's deployment id
    pub fn new(app_id: impl Into<String>, settings: FsmSettings) -> Self {
        Self {
            app_id: app_id.into(),
            settings,
            state: PollState::AwaitingDeploymentId,
            elapsed: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Time accounted so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of ticks processed
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Largest number of ticks that can perform a fetch before the deadline.
    ///
    /// The tick after these moves to `TimedOut` and fetches nothing.
    pub fn max_polling_ticks(&self) -> u32 {
        let interval = self.settings.poll_interval.as_nanos().max(1);
        let timeout = self.settings.deployment_timeout.as_nanos();
        u32::try_from(timeout.div_ceil(interval) + 1).unwrap_or(u32::MAX)
    }

    /// Terminal outcome, once reached
    pub fn outcome(&self) -> Option<DeploymentOutcome> {
        match &self.state {
            PollState::Succeeded(app) => Some(DeploymentOutcome::Success(app.clone())),
            PollState::Failed(reason) => Some(DeploymentOutcome::Failed {
                reason: reason.clone(),
            }),
            PollState::TimedOut => Some(DeploymentOutcome::TimedOut {
                app_id: self.app_id.clone(),
            }),
            _ => None,
        }
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: PollEvent) -> Result<(), String> {
        let new_state = match (&self.state, event) {
            (state, event) if state.is_terminal() => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }

            (_, PollEvent::Tick) => {
                if self.elapsed > self.settings.deployment_timeout {
                    PollState::TimedOut
                } else {
                    self.elapsed += self.settings.poll_interval;
                    self.ticks += 1;
                    self.state.clone()
                }
            }

            // From AwaitingDeploymentId
            (PollState::AwaitingDeploymentId, PollEvent::AppObserved(app)) => {
                match app.current_deployment_id {
                    Some(deployment_id) => PollState::Polling { deployment_id },
                    None => PollState::AwaitingDeploymentId,
                }
            }

            // From Polling
            (PollState::Polling { deployment_id }, PollEvent::ProgressObserved(progress)) => {
                if progress.succeeded_steps == progress.total_steps {
                    PollState::Converging {
                        deployment_id: deployment_id.clone(),
                    }
                } else if progress.failed_steps > 0 {
                    PollState::Failed(format!(
                        "error deploying app ({}) (deployment ID: {}): {}",
                        self.app_id, deployment_id, progress
                    ))
                } else {
                    PollState::Polling {
                        deployment_id: deployment_id.clone(),
                    }
                }
            }

            // From Converging
            (PollState::Converging { .. }, PollEvent::Converged(app)) => PollState::Succeeded(app),

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }

    /// Status line for a deployment that is still rolling out
    pub fn progress_line(&self, deployment_id: &str, progress: &DeploymentProgress) -> String {
        format!(
            "Waiting for app ({}) deployment ({}) to become active. Phase: {} ({}/{})",
            self.app_id,
            deployment_id,
            progress.phase,
            progress.succeeded_steps,
            progress.total_steps
        )
    }
}
