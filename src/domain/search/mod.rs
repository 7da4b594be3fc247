//! Search domain: result categories, items, result sets and matching rules

mod category;
mod item;
pub mod matcher;
mod result_set;
mod source;

pub use category::Category;
pub use item::{
    MedicationPayload, ProcedurePayload, ProviderPayload, ResultItem, ResultPayload,
    SpecialtyPayload,
};
pub use result_set::{
    AggregatedResultSet, ResultOrigin, SearchPhase, SearchQuery, SearchSnapshot,
};
pub use source::SearchSource;

#[cfg(test)]
pub use source::mock;
