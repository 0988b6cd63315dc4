pub mod dto;
pub mod handlers;
pub mod page;
pub mod record;
pub mod services;
pub mod theme;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::page_routes()
}

pub fn api_router() -> Router<AppState> {
    handlers::api_routes()
}
