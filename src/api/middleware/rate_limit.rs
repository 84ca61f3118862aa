//! Per-client rate limiting using the token bucket algorithm.
//!
//! Clients are keyed by IP. When the service runs behind a reverse proxy the
//! socket peer is the proxy itself, so the `proxied_*` variants read the
//! client address from `X-Forwarded-For`, `X-Real-Ip` or `Forwarded` first.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

const PUBLIC_PER_SECOND: u64 = 2;
const PUBLIC_BURST: u32 = 100;
const API_PER_SECOND: u64 = 1;
const API_BURST: u32 = 20;

fn build<K>(key_extractor: K, per_second: u64, burst: u32) -> RateLimitLayer<K>
where
    K: KeyExtractor,
{
    let config = GovernorConfigBuilder::default()
        .key_extractor(key_extractor)
        .per_second(per_second)
        .burst_size(burst)
        .finish()
        .expect("rate limit constants are non-zero");

    GovernorLayer::new(Arc::new(config))
}

/// Limiter for the redirect path and health check.
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> RateLimitLayer<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, PUBLIC_PER_SECOND, PUBLIC_BURST)
}

/// Stricter limiter for the `/api` routes, which write to storage.
///
/// - **Rate**: 1 request per second
/// - **Burst**: 20 requests
pub fn secure_layer() -> RateLimitLayer<PeerIpKeyExtractor> {
    build(PeerIpKeyExtractor, API_PER_SECOND, API_BURST)
}

/// [`layer`] keyed by the forwarded client IP.
pub fn proxied_layer() -> RateLimitLayer<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, PUBLIC_PER_SECOND, PUBLIC_BURST)
}

/// [`secure_layer`] keyed by the forwarded client IP.
pub fn proxied_secure_layer() -> RateLimitLayer<SmartIpKeyExtractor> {
    build(SmartIpKeyExtractor, API_PER_SECOND, API_BURST)
}
