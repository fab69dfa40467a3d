mod disaster;

pub use disaster::{AuditAction, AuditEntry, Disaster, DisasterFilter};
