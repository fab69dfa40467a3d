mod resource;

pub use resource::{Resource, ResourceFilter, ResourceType};
