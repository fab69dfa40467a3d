mod disaster_dto;

pub use disaster_dto::*;
