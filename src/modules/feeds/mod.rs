//! Public emergency feeds: NWS weather alerts, OpenFEMA declarations and
//! FEMA open shelters.

mod client;
mod fema;
mod models;
mod shelters;
mod weather;

pub use client::{FeedError, FeedsClient};
pub use models::{EmergencyAlert, Shelter, WeatherAlert};
