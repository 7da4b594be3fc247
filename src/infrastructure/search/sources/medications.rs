use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::domain::search::{Category, MedicationPayload, ResultItem, SearchSource};
use crate::domain::ApiError;

/// A generic medication and the brand it stands in for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub generic_for: String,
}

impl Medication {
    pub fn new(name: impl Into<String>, generic_for: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_for: generic_for.into(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.generic_for.to_lowercase().contains(query)
    }

    fn to_item(&self) -> ResultItem {
        ResultItem::medication(
            format!("med-{}", self.name.to_lowercase().replace(' ', "-")),
            format!("{} - {}", self.generic_for, self.name),
            MedicationPayload {
                name: self.name.clone(),
                generic_for: Some(self.generic_for.clone()),
            },
        )
        .with_secondary("Medication")
    }
}

static BUILTIN_MEDICATIONS: Lazy<Vec<Medication>> = Lazy::new(|| {
    vec![
        Medication::new("Metformin", "Glucophage"),
        Medication::new("Atorvastatin", "Lipitor"),
        Medication::new("Semaglutide", "Ozempic"),
        Medication::new("Lisinopril", "Zestril"),
        Medication::new("Levothyroxine", "Synthroid"),
        Medication::new("Amoxicillin", "Amoxil"),
        Medication::new("Omeprazole", "Prilosec"),
        Medication::new("Sertraline", "Zoloft"),
    ]
});

/// Medication lookup served from a local dataset
#[derive(Debug, Clone)]
pub struct MedicationSource {
    medications: Vec<Medication>,
}

impl MedicationSource {
    pub fn new(medications: Vec<Medication>) -> Self {
        Self { medications }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_MEDICATIONS.clone())
    }
}

impl Default for MedicationSource {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl SearchSource for MedicationSource {
    fn category(&self) -> Category {
        Category::Medication
    }

    fn name(&self) -> &'static str {
        "medications"
    }

    async fn search(&self, text: &str) -> Result<Vec<ResultItem>, ApiError> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .medications
            .iter()
            .filter(|medication| medication.matches(&query))
            .map(Medication::to_item)
            .collect())
    }
}
