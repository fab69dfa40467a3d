mod realtime_dto;

pub use realtime_dto::*;
