mod contact;
mod health;
mod metrics;

use axum::http::{HeaderMap, HeaderValue, header};

pub use contact::{CACHE_CONTROL, contact_info_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// Attached to every contact info response; the endpoint is public
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers
}
