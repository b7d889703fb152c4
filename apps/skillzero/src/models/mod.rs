pub mod participant;
pub mod profile;

pub use participant::{FormData, FormQuestion, ParticipantRecord, ProcessedData};
pub use profile::{ProfileField, ProfileInfo, ProfileSource, WorkHistory};
