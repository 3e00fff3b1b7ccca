//! Web layer for the bus booking service.
//!
//! Serves the booking page, static content pages, a booking endpoint and a
//! small JSON API over the same pipeline.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
