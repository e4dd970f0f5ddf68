use axum::{extract::{Path, State}, routing::{get, put}, Router, Json};
use axum::http::StatusCode;

use crate::application::todo_service::{ServiceError, TodoService};
use crate::domain::todo::{CreateTodo, SetCompletion, TodoId};
use crate::http::extract::{BodyRejection, JsonOrForm};
use crate::http::types::{todo_map, ApiError, Created, TodoMap, NAME_VALIDATION_MESSAGE};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
    pub validation_status: StatusCode,
}

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/:id", put(set_completion::<S>).patch(set_completion::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<TodoMap>, ApiError> {
    let todos = state.service.list().await.map_err(|e| service_error(&state, e))?;
    Ok(Json(todo_map(todos)))
}

// A body that does not parse gets the same answer as a missing name.
async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<JsonOrForm<CreateTodo>, BodyRejection>) -> Result<Json<Created>, ApiError> {
    let input = match payload {
        Ok(JsonOrForm(input)) => input,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable create body");
            CreateTodo::default()
        }
    };
    let id = state.service.create(input).await.map_err(|e| service_error(&state, e))?;
    Ok(Json(Created { id }))
}

async fn set_completion<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, JsonOrForm(payload): JsonOrForm<SetCompletion>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.set_completion(id, payload.is_completed).await.map_err(|e| service_error(&state, e))?;
    Ok(StatusCode::OK)
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await.map_err(|e| service_error(&state, e))?;
    Ok(StatusCode::OK)
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse().map(TodoId).map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "invalid id")) }

fn service_error<S: TodoService>(state: &AppState<S>, err: ServiceError) -> ApiError {
    match err {
        ServiceError::Validation(reason) => {
            tracing::debug!(%reason, "create rejected");
            ApiError::new(state.validation_status, NAME_VALIDATION_MESSAGE)
        }
        ServiceError::Storage(_) => {
            tracing::error!(error = %err, "storage failure");
            ApiError::internal()
        }
    }
}
