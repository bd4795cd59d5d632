//! The same REST surface on axum, plus the GraphQL endpoint.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::error::TodoResult;
use crate::graphql::{build_schema, TodoSchema};
use crate::rest::{
    self, DoneInput, Envelope, Failure, Operation, TodoInput, BODY_TOO_LARGE, CANNOT_PARSE_JSON,
    INVALID_ID, MAX_BODY, MISSING_DONE,
};
use crate::service::TodoService;
use crate::{shutdown_signal, Result};

#[derive(Clone)]
pub struct AppState {
    pub service: TodoService,
    pub schema: TodoSchema,
}

pub fn app(service: TodoService) -> Router {
    let state = AppState {
        schema: build_schema(service.clone()),
        service,
    };

    Router::new()
        .route("/todos", get(get_all_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo_by_id).put(update_todo).delete(delete_todo_by_id),
        )
        .route("/todos/{id}/done", patch(update_todo_done))
        .route("/graphql", post(graphql_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, service: TodoService) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("axum API listening on http://{}", addr);

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("axum API stopped");
    Ok(())
}

async fn create_todo(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let input: TodoInput = match read_json(body) {
        Ok(input) => input,
        Err(rejection) => return rejection,
    };
    let result = state.service.create(input.title, input.body).await;
    respond(Operation::Create, result.map(Some))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let Some(id) = rest::parse_id(&id) else {
        return bad_request(INVALID_ID);
    };
    let input: TodoInput = match read_json(body) {
        Ok(input) => input,
        Err(rejection) => return rejection,
    };
    let result = state.service.update(id, input.title, input.body).await;
    respond(Operation::Update, result.map(Some))
}

async fn update_todo_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let Some(id) = rest::parse_id(&id) else {
        return bad_request(INVALID_ID);
    };
    let input: DoneInput = match read_json(body) {
        Ok(input) => input,
        Err(rejection) => return rejection,
    };
    let Some(done) = input.done else {
        return bad_request(MISSING_DONE);
    };
    let result = state.service.mark_done(id, done).await;
    respond(Operation::MarkDone, result.map(Some))
}

async fn get_all_todos(State(state): State<AppState>) -> Response {
    respond(Operation::List, state.service.get_all().await.map(Some))
}

async fn get_todo_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = rest::parse_id(&id) else {
        return bad_request(INVALID_ID);
    };
    respond(Operation::Get, state.service.get_by_id(id).await.map(Some))
}

async fn delete_todo_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = rest::parse_id(&id) else {
        return bad_request(INVALID_ID);
    };
    let result = state.service.delete(id).await.map(|()| None::<()>);
    respond(Operation::Delete, result)
}

async fn graphql_handler(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(state.schema.execute(request).await)
}

fn respond<T: Serialize>(op: Operation, result: TodoResult<Option<T>>) -> Response {
    match result {
        Ok(data) => {
            let status = StatusCode::from_u16(op.success_status()).unwrap_or(StatusCode::OK);
            (status, Json(Envelope::new(op, data))).into_response()
        }
        Err(e) => {
            let (status, failure) = Failure::from_error(op, &e);
            if status >= 500 {
                error!("{}: {}", op.failure_message(), e);
            }
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(failure)).into_response()
        }
    }
}

/// Decodes the buffered body whatever its content type, the same way the
/// hyper adapter does.
fn read_json<T: DeserializeOwned>(
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<T, Response> {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("rejecting body over {} bytes", MAX_BODY);
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(Failure::bad_request(BODY_TOO_LARGE)),
            )
                .into_response());
        }
        Err(rejection) => {
            warn!("failed to read request body: {}", rejection);
            return Err(bad_request(CANNOT_PARSE_JSON));
        }
    };
    rest::decode_json(&bytes).ok_or_else(|| bad_request(CANNOT_PARSE_JSON))
}

fn bad_request(error: &'static str) -> Response {
    warn!("bad request: {}", error);
    (StatusCode::BAD_REQUEST, Json(Failure::bad_request(error))).into_response()
}
