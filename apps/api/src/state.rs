use sqlx::PgPool;

use crate::ai_gateway::AiClient;
use crate::auth::AuthClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// No mutable state lives here — each request owns its own auth context and
/// outbound calls, so invocations never contend.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub ai: AiClient,
    pub auth: AuthClient,
}
