mod official_update_handler;

pub use official_update_handler::*;
