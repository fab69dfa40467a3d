//! Citizen reports on a disaster, with optional image verification.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::ReportService;
