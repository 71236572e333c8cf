// Recruiter dashboard analytics: daily time series of postings created and
// applications received, bucketed in a fixed UTC+5:30 offset.

pub mod handlers;
pub mod trend;
