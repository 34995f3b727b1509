//! Cloud function binding: one JSON event in on stdin, one JSON response out
//! on stdout. Each invocation builds its own store.

use std::collections::BTreeMap;

use crate::{
    api::{self, ApiError, ApiResponse, Resource, CACHE_CONTROL_VALUE, JSON_CONTENT_TYPE},
    init,
    ledger::Ledger,
    prelude::*,
};

use anyhow::Context;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Deserialize, Debug)]
pub struct FunctionRequest {
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub path: String,

    /// Either the raw body text or an already-decoded JSON document.
    #[serde(default)]
    pub body: Option<Value>,
}

fn default_method() -> String {
    return "GET".to_string();
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: String,
}

impl FunctionRequest {
    fn body_bytes(&self) -> Vec<u8> {
        return match &self.body {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(text)) => text.clone().into_bytes(),
            Some(other) => other.to_string().into_bytes(),
        };
    }
}

fn headers(resource: Resource) -> BTreeMap<&'static str, &'static str> {
    return BTreeMap::from([
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", resource.allowed_methods()),
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Cache-Control", CACHE_CONTROL_VALUE),
        ("Content-Type", JSON_CONTENT_TYPE),
    ]);
}

pub async fn handle(ledger: &Ledger, request: &FunctionRequest) -> FunctionResponse {
    let resource = Resource::from_path(&request.path);

    let response = match Method::from_bytes(request.method.trim().to_uppercase().as_bytes()) {
        Ok(method) => api::dispatch(ledger, resource, &method, &request.body_bytes()).await,
        Err(_) => ApiResponse::from(ApiError::MethodNotAllowed),
    };

    return FunctionResponse {
        status_code: response.status.as_u16(),
        headers: headers(resource),
        body: response.body,
    };
}

pub async fn run(cfg: Config) -> Result {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read function event from stdin")?;

    let request: FunctionRequest =
        serde_json::from_str(&input).context("function event is not valid JSON")?;
    tracing::info!(method = %request.method, path = %request.path, "function invocation");

    let pool = init::db::init_sqlite_pool(&cfg).await?;
    let ledger = Ledger::new(pool.clone());

    let response = handle(&ledger, &request).await;
    pool.close().await;

    let mut output = serde_json::to_vec(&response)?;
    output.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;

    return Ok(());
}
