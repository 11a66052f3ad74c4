pub mod api;
pub mod auth;
pub mod cache;
pub mod code;
pub mod config;
pub mod forums;
pub mod index;
pub mod requests;
pub mod res;
pub mod session;

mod appresult;

use std::sync::Arc;

use axum::extract::FromRef;

pub use appresult::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub api: api::Client,
    pub store: Arc<cache::Store>,
}
