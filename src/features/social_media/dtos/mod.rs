mod social_media_dto;

pub use social_media_dto::*;
