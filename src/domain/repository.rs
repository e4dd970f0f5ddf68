use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId};

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn insert(&self, input: NewTodo) -> anyhow::Result<TodoId>;
    /// Returns `false` when no row matched `id`.
    async fn update_completion(&self, id: TodoId, is_completed: bool) -> anyhow::Result<bool>;
    /// Returns `false` when no row matched `id`.
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
}
