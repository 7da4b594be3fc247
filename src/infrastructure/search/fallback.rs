//! Static procedure catalog served when live sources fail or come back empty

use once_cell::sync::Lazy;

use super::sources::procedure_summary;
use crate::domain::search::{ProcedurePayload, ResultItem, matcher};

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackEntry {
    pub slug: String,
    pub display_name: String,
    pub canonical_name: String,
    pub category: String,
    pub synonyms: Vec<String>,
    pub provider_count: u32,
    pub best_price: f64,
}

impl FallbackEntry {
    pub fn new(
        slug: impl Into<String>,
        display_name: impl Into<String>,
        canonical_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            display_name: display_name.into(),
            canonical_name: canonical_name.into(),
            category: category.into(),
            synonyms: Vec::new(),
            provider_count: 0,
            best_price: 0.0,
        }
    }

    pub fn with_synonyms(mut self, synonyms: &[&str]) -> Self {
        self.synonyms = synonyms.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_pricing(mut self, provider_count: u32, best_price: f64) -> Self {
        self.provider_count = provider_count;
        self.best_price = best_price;
        self
    }

    fn matches(&self, query: &str) -> bool {
        let mut fields = vec![
            self.display_name.as_str(),
            self.canonical_name.as_str(),
            self.category.as_str(),
            self.slug.as_str(),
        ];
        fields.extend(self.synonyms.iter().map(String::as_str));

        matcher::terms_match(&fields, query)
    }

    fn to_item(&self) -> ResultItem {
        let item = ResultItem::procedure(
            self.slug.clone(),
            self.display_name.clone(),
            ProcedurePayload {
                slug: self.slug.clone(),
                category_name: Some(self.category.clone()),
                provider_count: Some(self.provider_count),
                best_price: Some(self.best_price),
            },
        );

        match procedure_summary(
            Some(self.category.as_str()),
            Some(self.provider_count),
            Some(self.best_price),
        ) {
            Some(summary) => item.with_secondary(summary),
            None => item,
        }
    }
}

static BUILTIN_CATALOG: Lazy<Vec<FallbackEntry>> = Lazy::new(|| {
    vec![
        FallbackEntry::new("brain-mri", "MRI - Brain", "MRI Brain", "Radiology")
            .with_synonyms(&["head mri", "magnetic resonance imaging"])
            .with_pricing(12, 850.0),
        FallbackEntry::new("leg-joint-mri", "MRI - Knee (Leg Joint)", "MRI Knee", "Radiology")
            .with_synonyms(&["knee mri", "imaging"])
            .with_pricing(10, 950.0),
        FallbackEntry::new("ct_abdomen", "CT Scan - Abdomen", "CT Abdomen", "Radiology")
            .with_synonyms(&["cat scan", "computed tomography"])
            .with_pricing(8, 650.0),
        FallbackEntry::new("chest-ct-scan", "CT Scan - Chest", "CT Chest", "Radiology")
            .with_synonyms(&["cat scan", "lung ct", "imaging"])
            .with_pricing(15, 150.0),
        FallbackEntry::new(
            "abdomen-ultrasound",
            "Ultrasound - Abdominal",
            "Abdominal Ultrasound",
            "Radiology",
        )
        .with_synonyms(&["sonogram", "imaging"])
        .with_pricing(9, 350.0),
        FallbackEntry::new(
            "complete-blood-cell-count-blood-test",
            "Complete Blood Count (CBC)",
            "CBC Blood Test",
            "Pathology",
        )
        .with_synonyms(&["lab work", "blood work"])
        .with_pricing(20, 75.0),
        FallbackEntry::new("colonoscopy", "Colonoscopy", "Colonoscopy", "Gastroenterology")
            .with_synonyms(&["colon cancer screening", "endoscopy"])
            .with_pricing(14, 1200.0),
    ]
});

/// Read-only offline catalog; filtering is a pure function of the query
#[derive(Debug, Clone)]
pub struct FallbackDataset {
    entries: Vec<FallbackEntry>,
}

impl FallbackDataset {
    pub fn new(entries: Vec<FallbackEntry>) -> Self {
        Self { entries }
    }

    /// Catalog of commonly searched procedures
    pub fn builtin() -> Self {
        Self::new(BUILTIN_CATALOG.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose fields contain every query term, in catalog order
    pub fn filter(&self, query: &str) -> Vec<ResultItem> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(query))
            .map(FallbackEntry::to_item)
            .collect()
    }
}

impl Default for FallbackDataset {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn names(items: &[ResultItem]) -> Vec<&str> {
        items.iter().map(|i| i.primary_text.as_str()).collect()
    }

    #[test]
    fn test_brain_mri_matches_reordered_title() {
        let items = FallbackDataset::builtin().filter("brain mri");

        assert_eq!(names(&items), vec!["MRI - Brain"]);
        assert_eq!(items[0].category(), Category::Procedure);
        assert_eq!(items[0].id, "brain-mri");
    }

    #[test]
    fn test_single_term_matches_category_field() {
        let items = FallbackDataset::builtin().filter("radiology");
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_synonyms_participate() {
        let items = FallbackDataset::builtin().filter("cat scan");
        assert_eq!(names(&items), vec!["CT Scan - Abdomen", "CT Scan - Chest"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(FallbackDataset::builtin().filter("dental implant").is_empty());
        assert!(FallbackDataset::builtin().filter("").is_empty());
    }

    #[test]
    fn test_item_secondary_text() {
        let items = FallbackDataset::builtin().filter("colonoscopy");
        assert_eq!(
            items[0].secondary_text.as_deref(),
            Some("Gastroenterology • 14 providers • $1200")
        );
    }

    #[test]
    fn test_custom_catalog() {
        let dataset = FallbackDataset::new(vec![FallbackEntry::new(
            "x-ray-chest",
            "X-Ray - Chest",
            "Chest X-Ray",
            "Radiology",
        )]);

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.filter("chest x-ray").len(), 1);
    }
}
