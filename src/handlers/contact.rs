use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use sha2::{Digest, Sha256};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use crate::client_ip::client_key;
use crate::error::{GatewayError, Result};
use crate::handlers::cors_headers;
use crate::metrics::{BACKEND_ERRORS_TOTAL, RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::state::AppState;

// Shared caches may keep a successful answer for 5 minutes
pub const CACHE_CONTROL: &str = "public, max-age=300";

// Public read of the current contact details.
// Preflight gets CORS headers only, anything but GET is refused before the
// limiter sees it, and an admitted GET reads the store exactly once.
pub async fn contact_info_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let client = client_key(&headers);

    if method == Method::OPTIONS {
        tracing::info!(%client, outcome = "preflight", "contact info preflight");
        return preflight();
    }

    if method != Method::GET {
        tracing::info!(%client, %method, outcome = "method_not_allowed", "method not allowed");
        return GatewayError::MethodNotAllowed.into_response();
    }

    REQUEST_TOTAL.inc();

    if state.rate_limiter.is_rate_limited(&client) {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(%client, outcome = "rate_limited", "rate limit exceeded");
        return GatewayError::RateLimited.into_response();
    }

    let start_time = Instant::now();
    // a panicking store still gets a JSON 500
    let result = AssertUnwindSafe(read_contact(&state))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(GatewayError::internal(panic_message(panic.as_ref()))));
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            tracing::info!(%client, outcome = "served", "contact info served");
            response
        }
        Err(error) => {
            match &error {
                GatewayError::Backend(source) => {
                    BACKEND_ERRORS_TOTAL.inc();
                    tracing::error!(
                        %client,
                        outcome = "backend_error",
                        error = %source,
                        "failed to fetch contact info"
                    );
                }
                other => {
                    tracing::error!(
                        %client,
                        outcome = "internal_error",
                        error = %other,
                        "unexpected error serving contact info"
                    );
                }
            }
            error.into_response()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic while serving contact info".to_string()
    }
}

async fn read_contact(state: &AppState) -> Result<Response> {
    let record = state.store.latest().await?;

    // `null` when the table is still empty
    let body = serde_json::to_vec(&record)
        .map_err(|e| GatewayError::internal(format!("serialize contact record: {e}")))?;
    let etag = format!("\"{:x}\"", Sha256::digest(&body));

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response();

    response.headers_mut().extend(cors_headers());
    Ok(response)
}

fn preflight() -> Response {
    let mut response = StatusCode::OK.into_response();
    response.headers_mut().extend(cors_headers());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::rate_limit::RateLimiter;
    use crate::store::InMemoryContactStore;
    use axum::http::HeaderValue;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryContactStore::new()),
            Arc::new(RateLimiter::new(Arc::new(SystemClock))),
        )
    }

    // logs a single request at the default info level and returns the output
    async fn logged(method: Method) -> (StatusCode, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("192.0.2.61"));
        let response = contact_info_handler(State(state()), method, headers).await;
        (response.status(), buffer.contents())
    }

    #[tokio::test]
    async fn wrong_method_is_logged_with_client() {
        let (status, logs) = logged(Method::DELETE).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(logs.contains("method_not_allowed"), "logs: {logs}");
        assert!(logs.contains("192.0.2.61"), "logs: {logs}");
    }

    #[tokio::test]
    async fn preflight_is_logged_with_client() {
        let (status, logs) = logged(Method::OPTIONS).await;
        assert_eq!(status, StatusCode::OK);
        assert!(logs.contains("preflight"), "logs: {logs}");
        assert!(logs.contains("192.0.2.61"), "logs: {logs}");
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn Any + Send> = Box::new("store exploded");
        assert_eq!(panic_message(payload.as_ref()), "panic: store exploded");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "panic: owned");

        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "panic while serving contact info");
    }
}
