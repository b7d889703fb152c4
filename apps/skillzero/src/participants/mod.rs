// Participant records: survey ingestion, duplicate merging, and the persisted
// intermediate JSON handed from the `process` stage to the `prompts` stage.

pub mod dedup;
pub mod ingest;
pub mod store;

pub use dedup::merge_duplicates;
pub use ingest::read_survey;
pub use store::{load_processed, save_processed};
