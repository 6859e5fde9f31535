//! `/health` endpoint.

use serde::Serialize;

/// Health check response body: `{"ok": true}`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HealthResponse {
    /// Always `true` while the process serves requests.
    pub ok: bool,
}

/// Build the health response.
pub fn health_check() -> HealthResponse {
    HealthResponse { ok: true }
}
