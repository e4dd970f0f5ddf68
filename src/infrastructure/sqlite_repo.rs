use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Every connection to `sqlite::memory:` opens its own empty database,
        // so an in-memory store must live on exactly one connection.
        let options = if database_url.starts_with("sqlite::memory:") {
            SqlitePoolOptions::new().max_connections(1).idle_timeout(None).max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                is_completed BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, name, is_completed FROM todos")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn insert(&self, input: NewTodo) -> Result<TodoId> {
        let result = sqlx::query("INSERT INTO todos (name, is_completed) VALUES (?1, 0)")
            .bind(input.name())
            .execute(&*self.pool)
            .await?;
        Ok(TodoId(result.last_insert_rowid()))
    }

    async fn update_completion(&self, id: TodoId, is_completed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE todos SET is_completed = ?2 WHERE id = ?1")
            .bind(id.0)
            .bind(is_completed)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        name: row.try_get("name")?,
        is_completed: row.try_get("is_completed")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::CreateTodo;

    async fn repo() -> SqliteTodoRepository {
        let repo = SqliteTodoRepository::connect("sqlite::memory:").await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    fn new_todo(name: &str) -> NewTodo { CreateTodo { name: Some(name.into()) }.validate().unwrap() }

    #[tokio::test]
    async fn insert_defaults_to_incomplete() {
        let repo = repo().await;
        let id = repo.insert(new_todo("Buy milk")).await.unwrap();
        assert_eq!(id, TodoId(1));
        assert_eq!(repo.find_all().await.unwrap(), vec![Todo { id, name: "Buy milk".into(), is_completed: false }]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = repo().await;
        let first = repo.insert(new_todo("a")).await.unwrap();
        assert!(repo.delete(first).await.unwrap());
        let second = repo.insert(new_todo("b")).await.unwrap();
        assert!(second.0 > first.0);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = repo().await;
        let id = repo.insert(new_todo("a")).await.unwrap();
        assert!(repo.update_completion(id, true).await.unwrap());
        assert!(!repo.update_completion(TodoId(42), true).await.unwrap());
        assert!(!repo.delete(TodoId(42)).await.unwrap());
        assert!(repo.find_all().await.unwrap()[0].is_completed);
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let repo = repo().await;
        repo.insert(new_todo("a")).await.unwrap();
        repo.init().await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
