pub mod impact_service;
pub mod summary_service;

pub use impact_service::{FixedImpactPolicy, ImpactPolicy};
pub use summary_service::{ForestSummary, HomeSummary, SummaryService};
