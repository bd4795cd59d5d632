//! GraphQL resolvers over [`TodoService`].
//!
//! - Queries: `todos`, `todo(id)`
//! - Mutations: `createTodo`, `updateTodo`, `markTodoAsDone`, `deleteTodo`

use async_graphql::{Context, EmptySubscription, Object, Schema};

use crate::models::Todo;
use crate::service::TodoService;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: TodoService) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn todos(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Todo>> {
        let service = ctx.data::<TodoService>()?;
        Ok(service.get_all().await?)
    }

    async fn todo(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Todo> {
        let service = ctx.data::<TodoService>()?;
        Ok(service.get_by_id(id).await?)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_todo(
        &self,
        ctx: &Context<'_>,
        title: String,
        body: String,
    ) -> async_graphql::Result<Todo> {
        let service = ctx.data::<TodoService>()?;
        Ok(service.create(title, body).await?)
    }

    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        id: i32,
        title: String,
        body: String,
    ) -> async_graphql::Result<Todo> {
        let service = ctx.data::<TodoService>()?;
        Ok(service.update(id, title, body).await?)
    }

    async fn mark_todo_as_done(
        &self,
        ctx: &Context<'_>,
        id: i32,
        done: bool,
    ) -> async_graphql::Result<Todo> {
        let service = ctx.data::<TodoService>()?;
        Ok(service.mark_done(id, done).await?)
    }

    async fn delete_todo(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<bool> {
        let service = ctx.data::<TodoService>()?;
        service.delete(id).await?;
        Ok(true)
    }
}
