use crate::core::scoring::JitterSource;
use crate::models::UserProfile;

/// Score from which a match is called exceptional rather than very good
pub const EXCEPTIONAL_SCORE: u8 = 85;

const TEMPLATE_COUNT: usize = 5;
const FALLBACK_CITY: &str = "deinem Standort";
const FALLBACK_SKILL: &str = "deinen Fähigkeiten";

/// Short German explanation shown on a result card
///
/// One of five fixed templates is chosen uniformly. `distance` is the
/// already formatted distance string (e.g. `"12 km"`).
pub fn generate_reason<J: JitterSource + ?Sized>(
    profile: &UserProfile,
    distance: &str,
    score: u8,
    jitter: &mut J,
) -> String {
    let city = profile
        .location
        .as_ref()
        .map(|location| location.city.as_str())
        .unwrap_or(FALLBACK_CITY);

    match jitter.pick(TEMPLATE_COUNT) {
        0 => format!(
            "Perfekte Übereinstimmung mit deinen Interessen und nur {} von {} entfernt.",
            distance, city
        ),
        1 => {
            let skill = profile
                .top_skill()
                .filter(|skill| !skill.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_SKILL.to_string());
            format!(
                "Deine Stärken in {} passen ideal zu den Anforderungen dieser Position.",
                skill
            )
        }
        2 => "Starke Korrelation zwischen deinem Profil und den Stellenanforderungen in der Region.".to_string(),
        3 => "Optimale Kombination aus Interessen, Standort und Entwicklungsmöglichkeiten.".to_string(),
        _ => {
            let tier = if score >= EXCEPTIONAL_SCORE {
                "Außergewöhnlich"
            } else {
                "Sehr"
            };
            format!("{} gute Übereinstimmung basierend auf deinen Zielen.", tier)
        }
    }
}
