use crate::{Error, Result};
use tracing::{debug, info, warn};

// Form states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Loading,
    Succeeded,
    Failed,
}

// Form events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    ValidationPassed,
    ValidationFailed,
    ResponseSucceeded,
    ResponseFailed,
    Reset,
}

impl FormState {
    /// True while a submission is being validated or is on the wire.
    pub fn is_busy(&self) -> bool {
        matches!(self, FormState::Validating | FormState::Loading)
    }

    /// Settled states accept a new submission just like `Idle` does.
    pub fn is_settled(&self) -> bool {
        matches!(self, FormState::Succeeded | FormState::Failed)
    }
}

pub struct FormStateMachine {
    name: &'static str,
    state: FormState,
}

impl FormStateMachine {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: FormState::Idle,
        }
    }

    pub fn current_state(&self) -> FormState {
        self.state
    }

    pub fn transition(&mut self, event: FormEvent) -> Result<FormState> {
        let old_state = self.state;
        debug!(
            "Form '{}' processing event {:?} in state {:?}",
            self.name, event, old_state
        );

        let new_state = match (self.state, event) {
            (_, FormEvent::Reset) => FormState::Idle,
            (FormState::Idle | FormState::Succeeded | FormState::Failed, FormEvent::Submit) => {
                FormState::Validating
            }
            (FormState::Validating, FormEvent::ValidationPassed) => FormState::Loading,
            (FormState::Validating, FormEvent::ValidationFailed) => FormState::Failed,
            (FormState::Loading, FormEvent::ResponseSucceeded) => FormState::Succeeded,
            (FormState::Loading, FormEvent::ResponseFailed) => FormState::Failed,
            _ => {
                warn!(
                    "Invalid transition for form '{}' from {:?} with event {:?}",
                    self.name, self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        if old_state != new_state {
            info!(
                "Form '{}' state transition: {:?} -> {:?} (event: {:?})",
                self.name, old_state, new_state, event
            );
        }

        self.state = new_state;
        Ok(new_state)
    }
}
