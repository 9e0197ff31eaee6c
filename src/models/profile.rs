use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Bureau {
    #[default]
    #[serde(rename = "Central Intelligence")]
    CentralIntelligence,
    #[serde(rename = "Financial Oversight")]
    FinancialOversight,
    #[serde(rename = "Foreign Affairs")]
    ForeignAffairs,
    #[serde(rename = "Tech & Surveillance")]
    TechSurveillance,
}

impl Bureau {
    pub fn label(&self) -> &'static str {
        match self {
            Bureau::CentralIntelligence => "Central Intelligence",
            Bureau::FinancialOversight => "Financial Oversight",
            Bureau::ForeignAffairs => "Foreign Affairs",
            Bureau::TechSurveillance => "Tech & Surveillance",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Bureau::CentralIntelligence => Bureau::FinancialOversight,
            Bureau::FinancialOversight => Bureau::ForeignAffairs,
            Bureau::ForeignAffairs => Bureau::TechSurveillance,
            Bureau::TechSurveillance => Bureau::CentralIntelligence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub bureau: Bureau,
    pub id_number: String,
    pub is_registered: bool,
}

impl UserProfile {
    pub fn new(name: &str, bureau: Bureau) -> Self {
        let number = rand::rng().random_range(10000..=99999);
        Self {
            name: name.trim().to_string(),
            bureau,
            id_number: format!("PR-{number}"),
            is_registered: true,
        }
    }
}
