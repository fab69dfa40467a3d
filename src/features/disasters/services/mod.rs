mod disaster_service;

pub use disaster_service::DisasterService;
