//! Client identifier used to key login rate limiting

use actix_web::HttpRequest;

const FORWARDED_FOR: &str = "X-Forwarded-For";

/// Resolves the identifier of the calling client
///
/// The first non-empty value wins: the trusted proxy header, the first
/// entry of `X-Forwarded-For`, the peer address, and finally `"unknown"`.
pub fn client_id(req: &HttpRequest, trusted_header: &str) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(value) = header(trusted_header) {
        return value.to_string();
    }

    if let Some(first) = header(FORWARDED_FOR)
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return first.to_string();
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
