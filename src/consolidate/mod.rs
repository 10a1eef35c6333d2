pub mod aggregates;
pub mod enrich;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod slug;

pub use enrich::enrich;
pub use model::{CanonicalSet, CityAggregate, ClubRecord, ClubStatus, RawClubRecord, StateAggregate};
pub use orchestrator::{consolidate_batch, run_pipeline, ConsolidationOutcome, RunStage};
pub use report::{FuzzyMerge, RunReport, SkipReason};
pub use slug::{slugify, SlugAllocator};
