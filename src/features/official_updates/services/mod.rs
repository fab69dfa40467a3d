mod official_update_service;

pub use official_update_service::OfficialUpdateService;
