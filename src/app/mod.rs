// HTTP layer: axum router, handlers and the admin views.

pub mod admin;
pub mod handlers;
pub mod server;
