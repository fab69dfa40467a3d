mod official_update_dto;

pub use official_update_dto::*;
