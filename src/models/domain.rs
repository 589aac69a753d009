use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Swiss postal-code location (reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub city: String,
    pub canton: String,
    pub coordinates: Coordinates,
    pub region: String,
    #[serde(rename = "majorCity", default)]
    pub major_city: bool,
}

/// Interest areas rated in the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestCategory {
    Technik,
    Handwerk,
    Soziales,
    Gesundheit,
    Business,
    Kreativ,
    Natur,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    #[serde(alias = "Klein")]
    Klein,
    #[serde(alias = "Mittel")]
    Mittel,
    #[serde(alias = "Gross")]
    Gross,
}

impl CompanySize {
    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Klein => "Klein",
            CompanySize::Mittel => "Mittel",
            CompanySize::Gross => "Gross",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkEnvironment {
    Buero,
    Praxis,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteTolerance {
    Kurz,
    Mittel,
    Lang,
    Egal,
}

/// Categorical work preferences from the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub company_size: CompanySize,
    pub work_environment: WorkEnvironment,
    pub commute: CommuteTolerance,
}

/// Self-reported profile, consumed once by the match generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    pub age: u8,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    pub interests: BTreeMap<InterestCategory, u8>,
    pub skills: Vec<String>,
    pub preferences: Preferences,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub avoidances: Vec<String>,
}

impl UserProfile {
    /// Rating for an interest, 0 when the user did not rate it
    pub fn interest(&self, category: InterestCategory) -> u8 {
        self.interests.get(&category).copied().unwrap_or(0)
    }

    /// First chosen skill in display form (`technisches_verstaendnis` -> `technisches verstaendnis`)
    pub fn top_skill(&self) -> Option<String> {
        self.skills.first().map(|skill| skill.replacen('_', " ", 1))
    }
}

/// Industry a profession belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "IT & Software")]
    ItSoftware,
    #[serde(rename = "Banking & Finance", alias = "Administration & Business")]
    BankingFinance,
    #[serde(rename = "Gesundheitswesen")]
    Healthcare,
    #[serde(rename = "Maschinenbau")]
    MechanicalEngineering,
    #[serde(rename = "Medien & Design")]
    MediaDesign,
    #[serde(rename = "Transport & Logistik")]
    TransportLogistics,
    #[serde(other)]
    Other,
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Industry::ItSoftware => "IT & Software",
            Industry::BankingFinance => "Banking & Finance",
            Industry::Healthcare => "Gesundheitswesen",
            Industry::MechanicalEngineering => "Maschinenbau",
            Industry::MediaDesign => "Medien & Design",
            Industry::TransportLogistics => "Transport & Logistik",
            Industry::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryBands {
    pub apprentice: String,
    pub junior: String,
    pub senior: String,
}

/// Profession catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub daily_tasks: Vec<String>,
    #[serde(default)]
    pub prospects: Vec<String>,
    pub average_salary: SalaryBands,
    pub duration: String,
    pub school_days: u8,
    pub work_days: u8,
    #[serde(default)]
    pub related_jobs: Vec<String>,
    pub industry: Industry,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub person: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProcess {
    pub steps: Vec<String>,
    pub requirements: Vec<String>,
    pub timeline: String,
    #[serde(default)]
    pub application_deadline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprenticeProgram {
    pub description: String,
    pub mentoring: bool,
    pub internal_training: bool,
    pub cross_department_rotation: bool,
    /// Percentage of apprentices hired after completion
    pub job_guarantee_after_completion: u8,
}

/// Training company
///
/// `locations` holds postal codes; they are resolved through the
/// location repository and the first resolvable one is the primary site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub size: CompanySize,
    pub employees: u32,
    #[serde(default)]
    pub industry: Option<Industry>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub founded_year: Option<u16>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub work_environment: Vec<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub application_process: Option<ApplicationProcess>,
    #[serde(default)]
    pub apprentice_program: Option<ApprenticeProgram>,
    #[serde(default)]
    pub current_openings: Option<u8>,
}

impl Company {
    /// Display form used on result cards, e.g. `Mittel (120 Mitarbeiter)`
    pub fn size_label(&self) -> String {
        format!("{} ({} Mitarbeiter)", self.size.label(), self.employees)
    }
}

/// Concrete opening of a profession at a company
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub job_category_id: String,
    pub company_id: String,
    pub title: String,
    /// Postal code of the workplace
    pub location: String,
    pub start_date: NaiveDate,
    pub application_deadline: NaiveDate,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    pub salary_range: String,
    #[serde(default)]
    pub is_highlighted: bool,
    pub posted_date: NaiveDate,
}

/// Sub-scores behind a composite match score, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interest: u8,
    pub skills: u8,
    pub location: u8,
    pub preferences: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingSummary {
    pub id: String,
    pub start_date: NaiveDate,
    pub application_deadline: NaiveDate,
    pub is_highlighted: bool,
}

impl From<&JobPosting> for PostingSummary {
    fn from(posting: &JobPosting) -> Self {
        Self {
            id: posting.id.clone(),
            start_date: posting.start_date,
            application_deadline: posting.application_deadline,
            is_highlighted: posting.is_highlighted,
        }
    }
}

/// Scored profession/company pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    pub title: String,
    #[serde(rename = "companyId")]
    pub company_id: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "postalCode")]
    pub postal_code: String,
    pub distance: String,
    #[serde(rename = "distanceKm")]
    pub distance_km: u32,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub scores: ScoreBreakdown,
    #[serde(rename = "aiReason")]
    pub ai_reason: String,
    pub salary: String,
    #[serde(rename = "openPositions")]
    pub open_positions: u8,
    #[serde(rename = "companySize")]
    pub company_size: String,
    pub industry: Industry,
    #[serde(default)]
    pub posting: Option<PostingSummary>,
}

/// Composite score weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub interest: f64,
    pub skills: f64,
    pub location: f64,
    pub preferences: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.interest + self.skills + self.location + self.preferences
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest: 0.4,
            skills: 0.3,
            location: 0.2,
            preferences: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(ScoringWeights::default().is_normalized());
    }

    #[test]
    fn test_industry_alias() {
        let industry: Industry = serde_json::from_str("\"Administration & Business\"").unwrap();
        assert_eq!(industry, Industry::BankingFinance);

        let unknown: Industry = serde_json::from_str("\"Gastronomie\"").unwrap();
        assert_eq!(unknown, Industry::Other);
    }

    #[test]
    fn test_top_skill_replaces_first_underscore() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "firstName": "Lea",
            "age": 15,
            "interests": { "technik": 5 },
            "skills": ["technisches_verstaendnis", "teamarbeit"],
            "preferences": { "companySize": "mittel", "workEnvironment": "mixed", "commute": "kurz" }
        }))
        .unwrap();

        assert_eq!(profile.top_skill().as_deref(), Some("technisches verstaendnis"));
        assert_eq!(profile.interest(InterestCategory::Technik), 5);
        assert_eq!(profile.interest(InterestCategory::Natur), 0);
        assert!(profile.location.is_none());
    }

    #[test]
    fn test_company_size_label() {
        let company: Company = serde_json::from_value(serde_json::json!({
            "id": "acme",
            "name": "Acme Tools",
            "size": "Mittel",
            "employees": 120,
            "locations": ["9000"]
        }))
        .unwrap();

        assert_eq!(company.size_label(), "Mittel (120 Mitarbeiter)");
        assert!(company.current_openings.is_none());
    }
}
