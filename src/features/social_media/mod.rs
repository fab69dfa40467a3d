//! Social media search, filtered views and posting.

pub mod dtos;
pub mod handlers;
pub mod routes;
