//! # bistro-api
//!
//! HTTP API layer for the Bistro Boss restaurant backend.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the menu, reviews, carts, users, payments and stats
//! - Bearer token issuing and the route guards that check it
//!
//! ## Endpoints
//!
//! | Method | Path | Access | Description |
//! |--------|------|--------|-------------|
//! | GET | `/` | public | Liveness text |
//! | GET | `/health` | public | Health check with store ping |
//! | GET | `/menu` | public | List menu items |
//! | GET | `/menu/{id}` | public | Get menu item |
//! | POST | `/menu` | admin | Create menu item |
//! | PATCH | `/menu/{id}` | admin | Update menu item (admin-only on purpose, like the other menu writes) |
//! | DELETE | `/menu/{id}` | admin | Delete menu item |
//! | GET | `/reviews` | public | List reviews |
//! | GET | `/carts?email=` | public | List cart lines for an email |
//! | POST | `/carts` | public | Add cart line |
//! | DELETE | `/carts/{id}` | public | Remove cart line |
//! | GET | `/users` | admin | List users |
//! | POST | `/users` | public | Register user (idempotent by email) |
//! | PATCH | `/users/admin/{id}` | admin | Promote user to admin |
//! | DELETE | `/users/{id}` | admin | Delete user |
//! | GET | `/users/admin/{email}` | owner | Admin flag for an email |
//! | POST | `/jwt` | public | Issue access token |
//! | POST | `/create-payment-intent` | public | Create Stripe intent |
//! | POST | `/payments` | public | Record payment, clear cart lines |
//! | GET | `/payments/{email}` | owner | Payment history |
//! | GET | `/admin-stats` | admin | Counts and revenue |
//! | GET | `/order-stats` | admin | Revenue by category |

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState, ConfigError};
