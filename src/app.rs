//! Shell state machine coordinating the form and the result view.
//!
//! One tagged union instead of loose booleans, so "loading and error at the
//! same time" cannot be represented. Exactly one submission may be in flight;
//! `Submitting` refuses further submits until the outcome event arrives.

use tracing::{error, info};

use crate::error::CompassError;
use crate::schemas::{HealthAssessmentResponse, UserHealthData};

/// The one user-facing failure message. Internal error detail goes to the
/// log only — it must never leak to the screen.
pub const ANALYSIS_FAILED_MESSAGE: &str = "We encountered an issue analyzing your symptoms. \
Please try again or check your internet connection.";

/// Top-level phase of the shell.
#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Ready(HealthAssessmentResponse),
    Failed(String),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Ready(_) => "ready",
            Phase::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct Shell {
    pub phase: Phase,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// submit(data): Idle → Submitting. Returns whether the transition was
    /// taken; the caller only dispatches the provider call on `true`.
    pub fn submit(&mut self, data: &UserHealthData) -> bool {
        match self.phase {
            Phase::Idle => {
                info!(age = %data.age, duration = %data.duration, "submitting assessment request");
                self.phase = Phase::Submitting;
                true
            }
            _ => false,
        }
    }

    /// Apply the outcome of the in-flight call. Ignored unless `Submitting` —
    /// a stale completion after a reset must not resurrect a discarded view.
    pub fn complete(&mut self, outcome: Result<HealthAssessmentResponse, CompassError>) {
        if !matches!(self.phase, Phase::Submitting) {
            return;
        }
        match outcome {
            Ok(response) => {
                info!(urgency = %response.urgency, "assessment ready");
                self.phase = Phase::Ready(response);
            }
            Err(err) => {
                error!(detail = %err, "assessment failed");
                self.phase = Phase::Failed(ANALYSIS_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// reset: Ready/Failed → Idle, discarding the held response or error.
    pub fn reset(&mut self) {
        if matches!(self.phase, Phase::Ready(_) | Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }
}
