mod client;
mod types;

pub use client::{HttpRemote, RemoteCall};
pub use types::{
    CallOutcome, MultipartPart, RemoteFailure, RemoteRequest, RemoteResponse, RequestBody,
    ResponseKind, ServerErrorBody,
};
