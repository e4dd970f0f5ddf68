use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::todo::{Todo, TodoId};

pub const NAME_VALIDATION_MESSAGE: &str = "Name field is required and must be less than 255 characters.";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub message: String }

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self { Self { status, message: message.into() } }

    pub fn internal() -> Self { Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error") }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(ErrorBody { message: self.message })).into_response() }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Created { pub id: TodoId }

/// Listing keyed by id. JSON object keys are the ids rendered as strings.
pub type TodoMap = BTreeMap<TodoId, Todo>;

pub fn todo_map(todos: Vec<Todo>) -> TodoMap {
    todos.into_iter().map(|t| (t.id, t)).collect()
}
