mod health_handler;

pub use health_handler::*;
