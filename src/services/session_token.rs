// src/services/session_token.rs
use uuid::Uuid;

/// Fresh random session token, regenerated on every history clear.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}
