use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::db::DbPool;
use crate::error::{TodoError, TodoResult};
use crate::models::Todo;
use crate::store;

/// Pass-through from the transports to the store.
///
/// Diesel is blocking, so each call checks out a pooled connection on
/// tokio's blocking pool.
#[derive(Clone)]
pub struct TodoService {
    pool: DbPool,
}

impl TodoService {
    pub fn new(pool: DbPool) -> Self {
        TodoService { pool }
    }

    pub async fn create(&self, title: String, body: String) -> TodoResult<Todo> {
        require_title(&title)?;
        debug!("creating todo {:?}", title);
        self.run(move |conn| store::insert(conn, &title, &body)).await
    }

    pub async fn update(&self, id: i32, title: String, body: String) -> TodoResult<Todo> {
        require_title(&title)?;
        debug!("updating todo {}", id);
        self.run(move |conn| store::update_content(conn, id, &title, &body))
            .await
    }

    pub async fn mark_done(&self, id: i32, done: bool) -> TodoResult<Todo> {
        debug!("marking todo {} done={}", id, done);
        self.run(move |conn| store::update_done(conn, id, done)).await
    }

    pub async fn get_all(&self) -> TodoResult<Vec<Todo>> {
        self.run(store::find_all).await
    }

    pub async fn get_by_id(&self, id: i32) -> TodoResult<Todo> {
        self.run(move |conn| store::find(conn, id)).await
    }

    pub async fn delete(&self, id: i32) -> TodoResult<()> {
        debug!("deleting todo {}", id);
        self.run(move |conn| store::soft_delete(conn, id)).await
    }

    async fn run<T, F>(&self, op: F) -> TodoResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TodoResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            op(&mut *conn)
        })
        .await?
    }
}

fn require_title(title: &str) -> TodoResult<()> {
    if title.trim().is_empty() {
        return Err(TodoError::Invalid("title must not be empty".to_string()));
    }
    Ok(())
}
