use serde::Serialize;

use super::Category;

/// Procedure-specific fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedurePayload {
    pub slug: String,
    pub category_name: Option<String>,
    pub provider_count: Option<u32>,
    pub best_price: Option<f64>,
}

/// Provider (doctor / facility) fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPayload {
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyPayload {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationPayload {
    pub name: String,
    /// Brand name the generic stands in for
    pub generic_for: Option<String>,
}

/// Category-tagged payload; the variant decides the item's category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultPayload {
    Procedure(ProcedurePayload),
    Provider(ProviderPayload),
    Specialty(SpecialtyPayload),
    Medication(MedicationPayload),
}

impl ResultPayload {
    pub fn category(&self) -> Category {
        match self {
            ResultPayload::Procedure(_) => Category::Procedure,
            ResultPayload::Provider(_) => Category::Provider,
            ResultPayload::Specialty(_) => Category::Specialty,
            ResultPayload::Medication(_) => Category::Medication,
        }
    }
}

/// A single search hit. `id` is unique within its category only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub id: String,
    pub primary_text: String,
    pub secondary_text: Option<String>,
    pub payload: ResultPayload,
}

impl ResultItem {
    pub fn new(id: impl Into<String>, primary_text: impl Into<String>, payload: ResultPayload) -> Self {
        Self {
            id: id.into(),
            primary_text: primary_text.into(),
            secondary_text: None,
            payload,
        }
    }

    pub fn with_secondary(mut self, text: impl Into<String>) -> Self {
        self.secondary_text = Some(text.into());
        self
    }

    pub fn category(&self) -> Category {
        self.payload.category()
    }

    pub fn procedure(id: impl Into<String>, name: impl Into<String>, payload: ProcedurePayload) -> Self {
        Self::new(id, name, ResultPayload::Procedure(payload))
    }

    pub fn provider(id: impl Into<String>, name: impl Into<String>, payload: ProviderPayload) -> Self {
        Self::new(id, name, ResultPayload::Provider(payload))
    }

    pub fn specialty(id: impl Into<String>, payload: SpecialtyPayload) -> Self {
        let name = payload.name.clone();
        Self::new(id, name, ResultPayload::Specialty(payload))
    }

    pub fn medication(id: impl Into<String>, display: impl Into<String>, payload: MedicationPayload) -> Self {
        Self::new(id, display, ResultPayload::Medication(payload))
    }
}
