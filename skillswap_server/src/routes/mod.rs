pub mod auth;
pub mod profile;

pub use auth::{dashboard_handler, login_handler, register_handler};
pub use profile::{
    all_profiles_handler, handle_request_handler, own_profile_handler, request_connection_handler,
    requests_handler, upsert_profile_handler,
};

pub async fn health_handler() -> &'static str {
    "ok"
}
