use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being served, or a fresh one outside the middleware.
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| Uuid::new_v4().to_string())
}

/// Tags each request with an id (reusing one supplied by the caller) and
/// echoes it on the response.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = match request.headers().get(REQUEST_ID_HEADER) {
        Some(existing) => existing.clone(),
        None => {
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request.headers_mut().insert(REQUEST_ID_HEADER, generated.clone());
            generated
        }
    };
    let request_id_str = request_id.to_str().unwrap_or("unknown").to_string();

    tracing::info!(
        request_id = %request_id_str,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = REQUEST_ID
        .scope(request_id_str.clone(), next.run(request))
        .await;

    let status = response.status();
    tracing::info!(
        request_id = %request_id_str,
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}
