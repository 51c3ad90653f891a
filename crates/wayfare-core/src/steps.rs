use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What to do when a workflow step could not be performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPolicy {
    /// Record the skipped step and keep going
    #[default]
    Continue,
    /// Stop the workflow at the first skipped step
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum StepOutcome {
    Ok,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub name: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Ordered log of every step a workflow attempted
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepReport {
    #[serde(skip)]
    policy: StepPolicy,
    steps: Vec<StepRecord>,
}

impl StepReport {
    pub fn new(policy: StepPolicy) -> Self {
        Self {
            policy,
            steps: Vec::new(),
        }
    }

    /// Record the result of a soft-gated step.
    ///
    /// Under [`StepPolicy::Abort`] a failed step ends the workflow.
    pub fn check(&mut self, name: impl Into<String>, done: bool, reason: &str) -> Result<()> {
        let name = name.into();
        if done {
            tracing::debug!("Step '{}' ok", name);
            self.steps.push(StepRecord {
                name,
                outcome: StepOutcome::Ok,
            });
            return Ok(());
        }

        tracing::warn!("Step '{}' skipped: {}", name, reason);
        self.steps.push(StepRecord {
            name: name.clone(),
            outcome: StepOutcome::Skipped(reason.to_string()),
        });

        match self.policy {
            StepPolicy::Continue => Ok(()),
            StepPolicy::Abort => Err(Error::StepFailed {
                step: name,
                reason: reason.to_string(),
            }),
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn skipped(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Skipped(_)))
    }

    pub fn all_ok(&self) -> bool {
        self.skipped().next().is_none()
    }
}
