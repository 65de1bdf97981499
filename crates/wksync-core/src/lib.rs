pub mod merge;
pub mod report;
pub mod subject;

pub use merge::{DEFAULT_SYNONYM_CAPACITY, MergeOutcome, merge};
pub use report::ReviewEntry;
pub use subject::VocabularySubject;
