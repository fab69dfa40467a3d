mod social_media_handler;

pub use social_media_handler::*;
