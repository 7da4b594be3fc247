//! Search aggregation: source adapters, merge policy, offline catalog and
//! the debounced aggregator

mod aggregator;
mod fallback;
mod merge;
pub mod sources;

pub use aggregator::SearchAggregator;
pub use fallback::{FallbackDataset, FallbackEntry};
pub use merge::MergePolicy;
pub use sources::{Medication, MedicationSource, ProcedureSource, ProviderSource, SpecialtySource};
