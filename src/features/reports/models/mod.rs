mod report;

pub use report::{Report, ReportFilter, VerificationStatus};
