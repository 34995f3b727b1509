use crate::{
    api::{self, ApiResponse, Resource},
    prelude::*,
};

use axum::{
    body::Bytes,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        return (
            self.status,
            [(header::CONTENT_TYPE, api::JSON_CONTENT_TYPE)],
            self.body,
        )
            .into_response();
    }
}

/// Runs the request on its own task so a client hanging up mid-request
/// cannot cancel a write halfway through.
pub async fn dispatch_detached(
    state: &AppState,
    resource: Resource,
    method: Method,
    body: Bytes,
) -> ApiResponse {
    let ledger = state.ledger.clone();

    let task = tokio::spawn(async move { api::dispatch(&ledger, resource, &method, &body).await });

    return match task.await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "request task failed");
            ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "request failed")
        }
    };
}
