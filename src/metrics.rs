use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("contact_requests_total", "Total number of contact info requests")
            .expect("contact_requests_total registers once");
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("contact_rate_limited_total", "Requests rejected by the rate limiter")
            .expect("contact_rate_limited_total registers once");
    pub static ref BACKEND_ERRORS_TOTAL: Counter =
        register_counter!("contact_backend_errors_total", "Failed reads from the backing store")
            .expect("contact_backend_errors_total registers once");
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "contact_request_latency_seconds",
        "Latency of admitted contact info requests in seconds"
    )
    .expect("contact_request_latency_seconds registers once");
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "rate_limiter_tracked_clients",
        "Client keys currently held by the rate limiter"
    )
    .expect("rate_limiter_tracked_clients registers once");
}
