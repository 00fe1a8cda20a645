use super::fsm::{FormEvent, FormState, FormStateMachine};
use crate::{
    Error, Result,
    remote::{CallOutcome, RemoteCall, RemoteFailure, RemoteRequest, RemoteResponse},
};
use tracing::{debug, info, warn};

/// One backend capability as seen by a form: how to validate the input,
/// how to turn it into a request and how to read the answer.
pub trait FormService: Send + Sync {
    type Input: Clone + Default + Send;
    type Output: Send;

    fn name(&self) -> &'static str;

    /// Client-side check run before anything is sent. The error string is
    /// shown to the user as-is.
    fn validate(&self, input: &Self::Input) -> std::result::Result<(), String>;

    fn build_request(&self, input: &Self::Input) -> Result<RemoteRequest>;

    fn decode(
        &self,
        input: &Self::Input,
        response: RemoteResponse,
    ) -> std::result::Result<Self::Output, RemoteFailure>;

    /// Shown when the backend gave no usable `detail`.
    fn fallback_message(&self) -> String;
}

/// A submission that passed validation and is waiting for its response.
#[derive(Debug, Clone)]
pub struct PendingCall<I> {
    pub generation: u64,
    pub request: RemoteRequest,
    pub input: I,
}

pub struct RequestForm<S: FormService> {
    service: S,
    input: S::Input,
    error: Option<String>,
    result: Option<S::Output>,
    generation: u64,
    fsm: FormStateMachine,
}

impl<S: FormService> RequestForm<S> {
    pub fn new(service: S) -> Self {
        Self::with_input(service, S::Input::default())
    }

    pub fn with_input(service: S, input: S::Input) -> Self {
        let fsm = FormStateMachine::new(service.name());
        Self {
            service,
            input,
            error: None,
            result: None,
            generation: 0,
            fsm,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn input(&self) -> &S::Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut S::Input {
        &mut self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&S::Output> {
        self.result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> FormState {
        self.fsm.current_state()
    }

    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }

    /// Whether the submit action should be enabled right now.
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.service.validate(&self.input).is_ok()
    }

    /// Validates the current input and moves the form into loading.
    ///
    /// Invalid input sets the form error and returns `Error::Validation`
    /// without producing a request.
    pub fn begin_submit(&mut self) -> Result<PendingCall<S::Input>> {
        if self.is_busy() {
            warn!(
                "Rejected submit on form '{}': request already in flight",
                self.service.name()
            );
            return Err(Error::Busy);
        }

        self.fsm.transition(FormEvent::Submit)?;

        if let Err(message) = self.service.validate(&self.input) {
            debug!(
                "Validation failed for form '{}': {}",
                self.service.name(),
                message
            );
            self.fsm.transition(FormEvent::ValidationFailed)?;
            self.error = Some(message.clone());
            return Err(Error::validation(message));
        }

        let request = match self.service.build_request(&self.input) {
            Ok(request) => request,
            Err(e) => {
                self.fsm.transition(FormEvent::ValidationFailed)?;
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.fsm.transition(FormEvent::ValidationPassed)?;
        self.error = None;
        // Superseded results are dropped here, which releases any blob they hold.
        self.result = None;
        self.generation += 1;

        info!(
            "Submitting form '{}' (generation {})",
            self.service.name(),
            self.generation
        );

        Ok(PendingCall {
            generation: self.generation,
            request,
            input: self.input.clone(),
        })
    }

    /// Decodes the response for `pending` and applies it if still current.
    pub fn complete(
        &mut self,
        pending: PendingCall<S::Input>,
        response: std::result::Result<RemoteResponse, RemoteFailure>,
    ) -> bool {
        let outcome: CallOutcome<S::Output> = response
            .and_then(|response| self.service.decode(&pending.input, response))
            .into();
        self.settle(pending.generation, outcome)
    }

    /// Applies an outcome. Outcomes from an older generation, or arriving
    /// when nothing is in flight, are discarded and `false` is returned.
    pub fn settle(&mut self, generation: u64, outcome: CallOutcome<S::Output>) -> bool {
        if generation != self.generation || self.state() != FormState::Loading {
            warn!(
                "Discarding stale response for form '{}' (generation {}, current {})",
                self.service.name(),
                generation,
                self.generation
            );
            return false;
        }

        match outcome {
            CallOutcome::Ok(output) => {
                self.result = Some(output);
                self.error = None;
                self.transition_after_response(FormEvent::ResponseSucceeded);
            }
            CallOutcome::Error { detail } => {
                let message = detail.unwrap_or_else(|| self.service.fallback_message());
                self.error = Some(message);
                self.transition_after_response(FormEvent::ResponseFailed);
            }
        }

        true
    }

    /// Runs one full submission against `remote`.
    ///
    /// Returns `Ok(())` once a result is stored; every failure also leaves
    /// its message in [`RequestForm::error`].
    pub async fn submit(&mut self, remote: &dyn RemoteCall) -> Result<()> {
        let pending = self.begin_submit()?;
        let response = remote.execute(pending.request.clone()).await;
        self.complete(pending, response);

        match &self.error {
            Some(message) => Err(Error::remote(message.clone())),
            None => Ok(()),
        }
    }

    /// Back to a blank idle form. Any in-flight response will be discarded.
    pub fn reset(&mut self) {
        info!("Resetting form '{}'", self.service.name());
        self.generation += 1;
        self.input = S::Input::default();
        self.error = None;
        self.result = None;
        // Reset is valid from every state.
        let _ = self.fsm.transition(FormEvent::Reset);
    }

    fn transition_after_response(&mut self, event: FormEvent) {
        if let Err(e) = self.fsm.transition(event) {
            warn!("Form '{}': {}", self.service.name(), e);
        }
    }
}
