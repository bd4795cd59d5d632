//! Response vocabulary shared by the hyper and axum REST handlers.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TodoError;

pub static INVALID_ID: &str = "Invalid ID";
pub static CANNOT_PARSE_JSON: &str = "Cannot parse JSON";
pub static MISSING_DONE: &str = "Missing 'done' field in request body";
pub static NOT_FOUND: &str = "Not Found";
pub static BODY_TOO_LARGE: &str = "Request body too large";

/// Largest request body either REST adapter will buffer.
pub const MAX_BODY: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    MarkDone,
    List,
    Get,
    Delete,
}

impl Operation {
    pub fn success_message(self) -> &'static str {
        match self {
            Operation::Create => "task created successfully",
            Operation::Update | Operation::MarkDone => "Task updated successfully",
            Operation::List => "Tasks fetched successfully",
            Operation::Get => "Task fetched successfully",
            Operation::Delete => "Task deleted successfully",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "failed to create a new task",
            Operation::Update | Operation::MarkDone => "Failed to update task",
            Operation::List => "Failed to fetch tasks",
            Operation::Get => "Failed to fetch task",
            Operation::Delete => "Failed to delete task",
        }
    }

    /// 201 for create, 200 for everything else.
    pub fn success_status(self) -> u16 {
        match self {
            Operation::Create => 201,
            _ => 200,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(op: Operation, data: Option<T>) -> Self {
        Envelope {
            message: op.success_message(),
            data,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Failure {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Failure {
    pub fn bad_request(error: &'static str) -> Self {
        Failure {
            error,
            details: None,
        }
    }

    /// Maps a service error to a status code and body.
    ///
    /// Only input validation is the caller's fault; every store error,
    /// not-found included, is reported as a 500.
    pub fn from_error(op: Operation, err: &TodoError) -> (u16, Self) {
        let status = if err.is_client_error() { 400 } else { 500 };
        (
            status,
            Failure {
                error: op.failure_message(),
                details: Some(err.to_string()),
            },
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize, Debug)]
pub struct DoneInput {
    pub done: Option<bool>,
}

pub fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Decodes a buffered body regardless of its declared content type;
/// `None` when it is not the expected JSON.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("rejecting request body: {}", e);
            None
        }
    }
}
