use rocket::{http::Status, serde::json::Json, Responder};
use serde::{Deserialize, Serialize};

#[derive(Responder, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ErrorBodyKind {
    Static(&'static str),
    Dynamic(String),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorBody {
    pub error: ErrorBodyKind,
}

#[derive(Responder, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error((Status, Json<ErrorBody>));

impl Error {
    pub fn new_static(status: Status, message: &'static str) -> Self {
        Error((
            status,
            Json(ErrorBody {
                error: ErrorBodyKind::Static(message),
            }),
        ))
    }

    pub fn new_dynamic(status: Status, message: impl Into<String>) -> Self {
        Error((
            status,
            Json(ErrorBody {
                error: ErrorBodyKind::Dynamic(message.into()),
            }),
        ))
    }
}

impl From<Status> for Error {
    fn from(value: Status) -> Self {
        let message = match value.code {
            400 => "bad request",
            403 => "forbidden",
            404 => "not found",
            405 => "method not allowed",
            413 => "payload too large",
            415 => "unsupported media type",
            422 => "unprocessable entity",
            500 => "internal server error",
            503 => "service unavailable",
            _ => "unknown",
        };

        Self::new_static(value, message)
    }
}

/// `{"success": true}`, the body of a successful deletion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn new() -> Self {
        Self { success: true }
    }
}

pub type JsonRes<T> = Result<(Status, Json<T>), Error>;
