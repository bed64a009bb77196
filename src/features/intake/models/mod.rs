mod classification;
mod summary;
mod urgency;

pub use classification::ClassificationResult;
pub use summary::SummaryResult;
pub use urgency::{UrgencyAssessment, UrgencyLevel};
