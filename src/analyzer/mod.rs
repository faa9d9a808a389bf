pub mod catalog;
pub mod summary;

pub use catalog::TrackCatalog;
pub use summary::{AnalysisSummary, TrackSummary};
