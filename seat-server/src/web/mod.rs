//! Web layer for the seat exchange.
//!
//! JSON endpoints for accounts, PNR verification and the marketplace,
//! plus a few server-rendered pages.

mod auth;
mod dto;
mod routes;
mod state;
pub mod templates;

pub use auth::{AuthUser, JourneyUser};
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
