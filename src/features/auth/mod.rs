//! Mock authentication.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/auth/login` | Log in with a demo account |
//! | GET | `/api/auth/me` | Resolve the caller from a bearer token or `X-User-Id` |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AuthService;
