use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const DEFAULT_TODO_COUNT: u64 = 150;
const DEFAULT_LIMIT: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub todo: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[derive(Deserialize)]
pub struct PageQuery {
    limit: Option<u64>,
    skip: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub todo: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedTodo {
    #[serde(flatten)]
    pub todo: Todo,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
}

/// In-memory todo table plus switches that make requests fail with 500.
#[derive(Debug, Default)]
pub struct Db {
    todos: RwLock<BTreeMap<u64, Todo>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

pub type SharedDb = Arc<Db>;

impl Db {
    pub fn empty() -> SharedDb {
        Arc::new(Self::default())
    }

    /// Ids `1..=count` with deterministic text and completion.
    pub fn seeded(count: u64) -> SharedDb {
        let todos = (1..=count)
            .map(|id| {
                let todo = Todo {
                    id,
                    todo: format!("Todo number {id}"),
                    completed: id % 3 == 0,
                    user_id: id % 20 + 1,
                };
                (id, todo)
            })
            .collect();
        Arc::new(Self {
            todos: RwLock::new(todos),
            ..Self::default()
        })
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub async fn get(&self, id: u64) -> Option<Todo> {
        self.todos.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    fn check(flag: &AtomicBool) -> Result<(), StatusCode> {
        if flag.load(Ordering::SeqCst) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        Ok(())
    }
}

pub fn app() -> Router {
    app_with(Db::seeded(DEFAULT_TODO_COUNT))
}

pub fn app_with(db: SharedDb) -> Router {
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn serve(listener: TcpListener, db: SharedDb) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// `limit=0` returns everything after `skip`, like the real service.
async fn list_todos(
    State(db): State<SharedDb>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TodoPage>, StatusCode> {
    Db::check(&db.fail_reads)?;
    let todos = db.todos.read().await;
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let take = if limit == 0 { usize::MAX } else { usize::try_from(limit).unwrap_or(usize::MAX) };
    let page: Vec<Todo> = todos
        .values()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(take)
        .cloned()
        .collect();
    debug!(skip, limit, returned = page.len(), "list todos");
    Ok(Json(TodoPage {
        limit: page.len() as u64,
        todos: page,
        total: todos.len() as u64,
        skip,
    }))
}

async fn get_todo(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    Db::check(&db.fail_reads)?;
    db.get(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    Db::check(&db.fail_writes)?;
    let mut todos = db.todos.write().await;
    let todo = todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(text) = input.todo {
        todo.todo = text;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
) -> Result<Json<DeletedTodo>, StatusCode> {
    Db::check(&db.fail_writes)?;
    let mut todos = db.todos.write().await;
    let todo = todos.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(DeletedTodo {
        todo,
        is_deleted: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_service_field_names() {
        let todo = Todo {
            id: 1,
            todo: "Test".to_string(),
            completed: false,
            user_id: 9,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["todo"], "Test");
        assert_eq!(json["completed"], false);
        assert_eq!(json["userId"], 9);
    }

    #[test]
    fn deleted_todo_is_flattened() {
        let deleted = DeletedTodo {
            todo: Todo {
                id: 4,
                todo: "Gone".to_string(),
                completed: true,
                user_id: 1,
            },
            is_deleted: true,
        };
        let json = serde_json::to_value(&deleted).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["isDeleted"], true);
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.todo.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn update_todo_partial_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert!(input.todo.is_none());
        assert_eq!(input.completed, Some(true));
    }

    #[tokio::test]
    async fn seeded_db_is_deterministic() {
        let db = Db::seeded(6);
        assert_eq!(db.len().await, 6);
        let third = db.get(3).await.unwrap();
        assert_eq!(third.todo, "Todo number 3");
        assert!(third.completed);
        assert!(db.get(7).await.is_none());
    }
}
