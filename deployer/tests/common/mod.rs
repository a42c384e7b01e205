//! In-process mock of the Notehub token, firmware and DFU endpoints

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use notehub_deploy::app::options::ClientOptions;
use notehub_deploy::NotehubClient;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const ACCESS_TOKEN: &str = "test-token";

/// Client ID for which the token endpoint answers without an access_token
pub const MALFORMED_CLIENT_ID: &str = "malformed";

/// Client ID for which the token endpoint never answers in time
pub const SLOW_CLIENT_ID: &str = "slow";

/// Project whose DFU endpoint fails with a 500
pub const BROKEN_PROJECT: &str = "app:broken";

/// Project whose firmware registry answers uploads with a non-JSON body
pub const GARBLED_PROJECT: &str = "app:garbled";

#[derive(Debug, Clone)]
pub struct Upload {
    pub project: String,
    pub filename: String,
    pub authorized: bool,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Trigger {
    pub project: String,
    pub authorized: bool,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub token_requests: Vec<HashMap<String, String>>,
    pub uploads: Vec<Upload>,
    pub triggers: Vec<Trigger>,
}

type Shared = Arc<Mutex<Recorded>>;

/// A mock Notehub that shuts down when dropped
pub struct MockNotehub {
    pub addr: SocketAddr,
    pub recorded: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockNotehub {
    pub async fn start() -> Self {
        let recorded: Shared = Arc::default();

        let router = Router::new()
            .route("/oauth2/token", post(token))
            .route(
                "/v1/projects/{project}/firmware/host/{filename}",
                put(upload),
            )
            .route("/v1/projects/{project}/dfu/host/update", post(trigger))
            .with_state(recorded.clone());

        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            recorded,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client pointed at this server
    pub fn client(&self) -> NotehubClient {
        NotehubClient::with_options(ClientOptions::for_host(&self.base_url())).unwrap()
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

impl Drop for MockNotehub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", ACCESS_TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"err": "authentication required", "code": 401, "status": "Unauthorized"})),
    )
        .into_response()
}

async fn token(State(recorded): State<Shared>, Form(form): Form<HashMap<String, String>>) -> Response {
    recorded.lock().unwrap().token_requests.push(form.clone());

    let client_id = form.get("client_id").map(String::as_str).unwrap_or_default();
    let client_secret = form.get("client_secret").map(String::as_str).unwrap_or_default();

    if form.get("grant_type").map(String::as_str) != Some("client_credentials") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "unsupported_grant_type"})))
            .into_response();
    }

    match client_id {
        SLOW_CLIENT_ID => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        MALFORMED_CLIENT_ID => Json(json!({"token_type": "bearer"})).into_response(),
        CLIENT_ID if client_secret == CLIENT_SECRET => Json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "bearer",
            "expires_in": 1799,
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_client"}))).into_response(),
    }
}

async fn upload(
    State(recorded): State<Shared>,
    Path((project, filename)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorized = is_authorized(&headers);
    recorded.lock().unwrap().uploads.push(Upload {
        project: project.clone(),
        filename: filename.clone(),
        authorized,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });

    if !authorized {
        return unauthorized();
    }

    if project == GARBLED_PROJECT {
        return "stored".into_response();
    }

    Json(json!({
        "filename": filename,
        "length": body.len(),
        "type": "host",
    }))
    .into_response()
}

async fn trigger(
    State(recorded): State<Shared>,
    Path(project): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = is_authorized(&headers);
    recorded.lock().unwrap().triggers.push(Trigger {
        project: project.clone(),
        authorized,
        query,
        body,
    });

    if !authorized {
        return unauthorized();
    }

    if project == BROKEN_PROJECT {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"err": "dfu scheduler unavailable"})),
        )
            .into_response();
    }

    Json(json!({})).into_response()
}
