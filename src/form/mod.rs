pub mod fsm;
mod request_form;

pub use fsm::{FormEvent, FormState, FormStateMachine};
pub use request_form::{FormService, PendingCall, RequestForm};
