use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, ValidationError};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid todo: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, input: CreateTodo) -> Result<TodoId>;
    /// Missing ids are a no-op; the return value only says whether a row changed.
    async fn set_completion(&self, id: TodoId, is_completed: bool) -> Result<bool>;
    async fn delete(&self, id: TodoId) -> Result<bool>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> Result<Vec<Todo>> { Ok(self.repo.find_all().await?) }

    async fn create(&self, input: CreateTodo) -> Result<TodoId> {
        let todo = input.validate()?;
        let id = self.repo.insert(todo).await?;
        tracing::info!(todo.id = id.0, "todo created");
        Ok(id)
    }

    async fn set_completion(&self, id: TodoId, is_completed: bool) -> Result<bool> {
        let updated = self.repo.update_completion(id, is_completed).await?;
        if updated {
            tracing::info!(todo.id = id.0, is_completed, "todo completion set");
        } else {
            tracing::debug!(todo.id = id.0, "set completion on missing todo ignored");
        }
        Ok(updated)
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(todo.id = id.0, "todo deleted");
        } else {
            tracing::debug!(todo.id = id.0, "delete on missing todo ignored");
        }
        Ok(deleted)
    }
}
