use crate::Result;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// What the caller expects a successful response body to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<MultipartPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub accept: ResponseKind,
}

impl RemoteRequest {
    pub fn post_json<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Json(serde_json::to_value(body)?),
            accept: ResponseKind::Json,
        })
    }

    pub fn post_multipart(path: impl Into<String>, parts: Vec<MultipartPart>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Multipart(parts),
            accept: ResponseKind::Json,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn expecting(mut self, accept: ResponseKind) -> Self {
        self.accept = accept;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResponse {
    Json(Value),
    Binary {
        content_type: Option<String>,
        data: Vec<u8>,
    },
}

impl RemoteResponse {
    /// Decodes a JSON body into `T`. A body of the wrong kind or shape is a
    /// failure without detail.
    pub fn into_json<T: DeserializeOwned>(self) -> std::result::Result<T, RemoteFailure> {
        match self {
            Self::Json(value) => {
                serde_json::from_value(value).map_err(|_| RemoteFailure::undecodable())
            }
            Self::Binary { .. } => Err(RemoteFailure::undecodable()),
        }
    }

    pub fn into_binary(self) -> std::result::Result<(Option<String>, Vec<u8>), RemoteFailure> {
        match self {
            Self::Binary { content_type, data } => Ok((content_type, data)),
            Self::Json(_) => Err(RemoteFailure::undecodable()),
        }
    }
}

/// Why a remote call did not produce a usable payload.
///
/// `status` is `None` when no HTTP response was received at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFailure {
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl RemoteFailure {
    pub fn transport() -> Self {
        Self::default()
    }

    pub fn undecodable() -> Self {
        Self::default()
    }

    pub fn from_response(status: u16, body: &[u8]) -> Self {
        Self {
            status: Some(status),
            detail: ServerErrorBody::decode(body),
        }
    }
}

/// Result of one remote call as seen by a form.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Ok(T),
    Error { detail: Option<String> },
}

impl<T> From<std::result::Result<T, RemoteFailure>> for CallOutcome<T> {
    fn from(result: std::result::Result<T, RemoteFailure>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(failure) => Self::Error {
                detail: failure.detail,
            },
        }
    }
}

/// Error body sent by the inference backends, e.g. `{"detail": "..."}`.
pub struct ServerErrorBody;

impl ServerErrorBody {
    /// Pulls `detail` out of an error body without assuming it is there.
    ///
    /// Strings are returned verbatim; an empty string counts as absent.
    /// Structured details (validation error lists) are returned as compact JSON.
    pub fn decode(body: &[u8]) -> Option<String> {
        let value: Value = serde_json::from_slice(body).ok()?;
        match value.get("detail")? {
            Value::Null => None,
            Value::String(detail) if detail.is_empty() => None,
            Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }
}
