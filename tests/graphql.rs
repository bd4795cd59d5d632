mod common;

use serde_json::{json, Value};
use todo_backend::graphql::{build_schema, TodoSchema};

async fn execute(schema: &TodoSchema, query: &str) -> (Value, Vec<String>) {
    let resp = schema.execute(query).await;
    let errors = resp.errors.iter().map(|e| e.message.clone()).collect();
    (resp.data.into_json().unwrap(), errors)
}

#[tokio::test]
async fn create_then_query_by_id() {
    let schema = build_schema(common::service());
    let (data, errors) = execute(
        &schema,
        r#"mutation { createTodo(title: "Read", body: "a book") { id } }"#,
    )
    .await;
    assert!(errors.is_empty(), "{errors:?}");
    let id = data["createTodo"]["id"].as_i64().unwrap();

    let (data, errors) = execute(
        &schema,
        &format!("{{ todo(id: {id}) {{ title body done createdAt updatedAt }} }}"),
    )
    .await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(data["todo"]["title"], "Read");
    assert_eq!(data["todo"]["body"], "a book");
    assert_eq!(data["todo"]["done"], false);
    assert!(data["todo"]["createdAt"].is_string());
}

#[tokio::test]
async fn mutations_cover_the_lifecycle() {
    let schema = build_schema(common::service());
    let (data, _) = execute(&schema, r#"mutation { createTodo(title: "a", body: "b") { id } }"#).await;
    let id = data["createTodo"]["id"].as_i64().unwrap();

    let (data, errors) = execute(
        &schema,
        &format!("mutation {{ markTodoAsDone(id: {id}, done: true) {{ done title }} }}"),
    )
    .await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(data["markTodoAsDone"], json!({"done": true, "title": "a"}));

    let (data, errors) = execute(
        &schema,
        &format!(r#"mutation {{ updateTodo(id: {id}, title: "c", body: "d") {{ title body done }} }}"#),
    )
    .await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(data["updateTodo"], json!({"title": "c", "body": "d", "done": true}));

    let (data, _) = execute(&schema, "{ todos { id } }").await;
    assert_eq!(data["todos"].as_array().unwrap().len(), 1);

    let (data, errors) = execute(&schema, &format!("mutation {{ deleteTodo(id: {id}) }}")).await;
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(data["deleteTodo"], true);

    let (_, errors) = execute(&schema, &format!("{{ todo(id: {id}) {{ id }} }}")).await;
    assert_eq!(errors, ["record not found"]);
}

#[tokio::test]
async fn update_of_missing_id_reports_not_found() {
    let schema = build_schema(common::service());
    let (_, errors) = execute(
        &schema,
        r#"mutation { updateTodo(id: 404, title: "x", body: "y") { id } }"#,
    )
    .await;
    assert_eq!(errors, ["record not found"]);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let schema = build_schema(common::service());
    let (_, errors) = execute(&schema, r#"mutation { createTodo(title: " ", body: "y") { id } }"#).await;
    assert_eq!(errors, ["title must not be empty"]);
}
