//! Disaster records.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/disasters` | List with tag, owner and search filters |
//! | POST | `/api/disasters` | Create |
//! | GET | `/api/disasters/nearby` | Within a radius of a point |
//! | GET | `/api/disasters/statistics` | Aggregate counts |
//! | GET/PUT/DELETE | `/api/disasters/{id}` | Read, update, delete |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::DisasterService;
