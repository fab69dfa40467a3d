mod disaster_handler;

pub use disaster_handler::*;
