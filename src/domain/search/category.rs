use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Result category produced by a search source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Procedure,
    Provider,
    Specialty,
    Medication,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Procedure,
        Category::Provider,
        Category::Specialty,
        Category::Medication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Procedure => "procedure",
            Category::Provider => "provider",
            Category::Specialty => "specialty",
            Category::Medication => "medication",
        }
    }

    /// Heading used when results are listed by category
    pub fn label(&self) -> &'static str {
        match self {
            Category::Procedure => "Procedures",
            Category::Provider => "Doctors",
            Category::Specialty => "Specialties",
            Category::Medication => "Medications",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "procedure" | "procedures" => Ok(Category::Procedure),
            "provider" | "providers" | "doctor" | "doctors" => Ok(Category::Provider),
            "specialty" | "specialties" => Ok(Category::Specialty),
            "medication" | "medications" => Ok(Category::Medication),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}
