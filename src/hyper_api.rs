//! REST handlers on a hand-routed hyper service.

use std::net::SocketAddr;

use bytes::BytesMut;
use hyper::body::HttpBody;
use hyper::service::{make_service_fn, service_fn};
use hyper::{header, Body, Method, Request, Response, Server, StatusCode};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TodoResult;
use crate::rest::{
    self, DoneInput, Envelope, Failure, Operation, TodoInput, BODY_TOO_LARGE, CANNOT_PARSE_JSON,
    INVALID_ID, MAX_BODY, MISSING_DONE, NOT_FOUND,
};
use crate::service::TodoService;
use crate::{shutdown_signal, GenericError, Result};

pub async fn serve(addr: SocketAddr, service: TodoService) -> Result<()> {
    let new_service = make_service_fn(move |_| {
        let service = service.clone();
        async move {
            Ok::<_, GenericError>(service_fn(move |req| route(req, service.clone())))
        }
    });

    let server = Server::try_bind(&addr)?.serve(new_service);
    info!("hyper API listening on http://{}", addr);

    server.with_graceful_shutdown(shutdown_signal()).await?;
    info!("hyper API stopped");
    Ok(())
}

pub async fn route(req: Request<Body>, service: TodoService) -> Result<Response<Body>> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    debug!("{} {}", method, path);

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (&method, segments.as_slice()) {
        (&Method::POST, ["todos"]) => create_todo(req, service).await,
        (&Method::GET, ["todos"]) => {
            let result = service.get_all().await.map(Some);
            respond(Operation::List, result)
        }
        (&Method::GET, ["todos", id]) => match rest::parse_id(id) {
            Some(id) => respond(Operation::Get, service.get_by_id(id).await.map(Some)),
            None => bad_request(INVALID_ID),
        },
        (&Method::PUT, ["todos", id]) => match rest::parse_id(id) {
            Some(id) => update_todo(req, id, service).await,
            None => bad_request(INVALID_ID),
        },
        (&Method::PATCH, ["todos", id, "done"]) => match rest::parse_id(id) {
            Some(id) => update_todo_done(req, id, service).await,
            None => bad_request(INVALID_ID),
        },
        (&Method::DELETE, ["todos", id]) => match rest::parse_id(id) {
            Some(id) => {
                let result = service.delete(id).await.map(|()| None::<()>);
                respond(Operation::Delete, result)
            }
            None => bad_request(INVALID_ID),
        },
        _ => json_response(StatusCode::NOT_FOUND, &Failure::bad_request(NOT_FOUND)),
    }
}

async fn create_todo(req: Request<Body>, service: TodoService) -> Result<Response<Body>> {
    let input: TodoInput = match read_json(req).await? {
        Ok(input) => input,
        Err(rejection) => return Ok(rejection),
    };
    let result = service.create(input.title, input.body).await.map(Some);
    respond(Operation::Create, result)
}

async fn update_todo(req: Request<Body>, id: i32, service: TodoService) -> Result<Response<Body>> {
    let input: TodoInput = match read_json(req).await? {
        Ok(input) => input,
        Err(rejection) => return Ok(rejection),
    };
    let result = service.update(id, input.title, input.body).await.map(Some);
    respond(Operation::Update, result)
}

async fn update_todo_done(
    req: Request<Body>,
    id: i32,
    service: TodoService,
) -> Result<Response<Body>> {
    let input: DoneInput = match read_json(req).await? {
        Ok(input) => input,
        Err(rejection) => return Ok(rejection),
    };
    let Some(done) = input.done else {
        return bad_request(MISSING_DONE);
    };
    let result = service.mark_done(id, done).await.map(Some);
    respond(Operation::MarkDone, result)
}

/// Buffers at most `MAX_BODY` bytes and decodes them, or hands back the
/// response rejecting the body.
async fn read_json<T: DeserializeOwned>(
    req: Request<Body>,
) -> Result<std::result::Result<T, Response<Body>>> {
    if content_length(&req).map_or(false, |len| len > MAX_BODY) {
        return Ok(Err(payload_too_large()?));
    }

    let mut body = req.into_body();
    let mut whole_body = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        if whole_body.len() + chunk.len() > MAX_BODY {
            return Ok(Err(payload_too_large()?));
        }
        whole_body.extend_from_slice(&chunk);
    }

    match rest::decode_json(&whole_body) {
        Some(value) => Ok(Ok(value)),
        None => Ok(Err(bad_request(CANNOT_PARSE_JSON)?)),
    }
}

fn content_length(req: &Request<Body>) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn respond<T: Serialize>(op: Operation, result: TodoResult<Option<T>>) -> Result<Response<Body>> {
    match result {
        Ok(data) => {
            let status = StatusCode::from_u16(op.success_status())?;
            json_response(status, &Envelope::new(op, data))
        }
        Err(e) => {
            let (status, failure) = Failure::from_error(op, &e);
            if status >= 500 {
                error!("{}: {}", op.failure_message(), e);
            }
            json_response(StatusCode::from_u16(status)?, &failure)
        }
    }
}

fn bad_request(error: &'static str) -> Result<Response<Body>> {
    warn!("bad request: {}", error);
    json_response(StatusCode::BAD_REQUEST, &Failure::bad_request(error))
}

fn payload_too_large() -> Result<Response<Body>> {
    warn!("rejecting body over {} bytes", MAX_BODY);
    json_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &Failure::bad_request(BODY_TOO_LARGE),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>> {
    let json = serde_json::to_string(body)?;
    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))?;
    Ok(response)
}
