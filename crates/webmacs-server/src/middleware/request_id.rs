//! Request-correlation id minted at ingress (§7: "unknown exceptions are
//! logged with a request-correlation id (a UUID minted at request
//! ingress)").

use tower_http::request_id::MakeRequestUuid;

/// Generates an `x-request-id` header value per request.
pub type RequestIdMaker = MakeRequestUuid;
