//! ORM statements against the `todos` table, one statement per operation.
//!
//! Soft-deleted rows are filtered out of every statement, so they read as
//! missing ids everywhere.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::{TodoError, TodoResult};
use crate::models::{NewTodo, Todo};
use crate::schema::todos;

pub fn insert(conn: &mut SqliteConnection, title: &str, body: &str) -> TodoResult<Todo> {
    let now = Utc::now().naive_utc();
    let new_todo = NewTodo {
        title,
        body,
        done: false,
        created_at: now,
        updated_at: now,
    };

    Ok(diesel::insert_into(todos::table)
        .values(&new_todo)
        .returning(Todo::as_returning())
        .get_result(conn)?)
}

pub fn update_content(
    conn: &mut SqliteConnection,
    id: i32,
    title: &str,
    body: &str,
) -> TodoResult<Todo> {
    diesel::update(todos::table.filter(todos::id.eq(id)).filter(todos::deleted_at.is_null()))
        .set((
            todos::title.eq(title),
            todos::body.eq(body),
            todos::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(Todo::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(TodoError::NotFound)
}

pub fn update_done(conn: &mut SqliteConnection, id: i32, done: bool) -> TodoResult<Todo> {
    diesel::update(todos::table.filter(todos::id.eq(id)).filter(todos::deleted_at.is_null()))
        .set((
            todos::done.eq(done),
            todos::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(Todo::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(TodoError::NotFound)
}

pub fn find_all(conn: &mut SqliteConnection) -> TodoResult<Vec<Todo>> {
    Ok(todos::table
        .filter(todos::deleted_at.is_null())
        .order(todos::id.asc())
        .select(Todo::as_select())
        .load(conn)?)
}

pub fn find(conn: &mut SqliteConnection, id: i32) -> TodoResult<Todo> {
    todos::table
        .filter(todos::id.eq(id))
        .filter(todos::deleted_at.is_null())
        .select(Todo::as_select())
        .first(conn)
        .optional()?
        .ok_or(TodoError::NotFound)
}

pub fn soft_delete(conn: &mut SqliteConnection, id: i32) -> TodoResult<()> {
    let now = Utc::now().naive_utc();
    let affected =
        diesel::update(todos::table.filter(todos::id.eq(id)).filter(todos::deleted_at.is_null()))
            .set((todos::deleted_at.eq(Some(now)), todos::updated_at.eq(now)))
            .execute(conn)?;

    if affected == 0 {
        return Err(TodoError::NotFound);
    }
    Ok(())
}
