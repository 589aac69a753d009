use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::{Industry, InterestCategory, ScoreBreakdown, ScoringWeights, UserProfile};

/// Span of the random bonus added on top of `base_score * 20`
const INTEREST_JITTER: f64 = 20.0;
const SKILLS_FLOOR: f64 = 70.0;
const SKILLS_JITTER: f64 = 30.0;
const PREFERENCES_FLOOR: f64 = 75.0;
const PREFERENCES_JITTER: f64 = 25.0;

/// Points per interest rating step
const INTEREST_POINTS_PER_STAR: f64 = 20.0;

/// Source of uniform randomness for score jitter
///
/// Production code draws from [`RngJitter`]; tests plug in
/// [`ConstantJitter`] to assert on score bounds.
pub trait JitterSource {
    /// Uniform draw in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in `[0, span)`
    fn jitter(&mut self, span: f64) -> f64 {
        self.next_unit() * span
    }

    /// Uniform index in `0..len`; returns 0 for an empty range
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Jitter backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible jitter for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same draw (clamped into `[0, 1)`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantJitter(pub f64);

impl ConstantJitter {
    /// Jitter that always draws the low end of every range
    pub const fn zero() -> Self {
        ConstantJitter(0.0)
    }
}

impl JitterSource for ConstantJitter {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Interest ratings that feed a profession's base score, with their weight
pub fn interest_affinity(industry: Industry) -> &'static [(InterestCategory, f64)] {
    match industry {
        Industry::ItSoftware => &[(InterestCategory::Technik, 1.0)],
        Industry::BankingFinance => &[(InterestCategory::Business, 1.0)],
        Industry::Healthcare => &[(InterestCategory::Gesundheit, 1.0)],
        Industry::MechanicalEngineering => &[(InterestCategory::Handwerk, 1.0)],
        // Media work draws on creativity first and technical interest second
        Industry::MediaDesign => &[(InterestCategory::Kreativ, 1.0), (InterestCategory::Technik, 0.5)],
        Industry::TransportLogistics => &[(InterestCategory::Transport, 1.0)],
        Industry::Other => &[],
    }
}

/// User's interest rating for a profession's industry (0 when unrated)
pub fn base_score(profile: &UserProfile, industry: Industry) -> f64 {
    interest_affinity(industry)
        .iter()
        .map(|(category, weight)| f64::from(profile.interest(*category)) * weight)
        .sum()
}

/// Unrounded sub-scores of one profession/company pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub interest: f64,
    pub skills: f64,
    pub location: f64,
    pub preferences: f64,
}

impl SubScores {
    /// Rounded values for display
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            interest: to_percent(self.interest),
            skills: to_percent(self.skills),
            location: to_percent(self.location),
            preferences: to_percent(self.preferences),
        }
    }
}

/// Draw the four sub-scores for a pair
///
/// Location is deterministic; the other three carry bounded jitter:
/// interest in `[base*20, base*20+20)`, skills in `[70, 100)`,
/// preferences in `[75, 100)`, all capped at 100.
pub fn calculate_sub_scores<J: JitterSource + ?Sized>(
    base_score: f64,
    location_score: u8,
    jitter: &mut J,
) -> SubScores {
    let interest = (base_score * INTEREST_POINTS_PER_STAR + jitter.jitter(INTEREST_JITTER)).min(100.0);
    let skills = (SKILLS_FLOOR + jitter.jitter(SKILLS_JITTER)).min(100.0);
    let preferences = (PREFERENCES_FLOOR + jitter.jitter(PREFERENCES_JITTER)).min(100.0);

    SubScores {
        interest,
        skills,
        location: f64::from(location_score),
        preferences,
    }
}

/// Weighted composite score (0-100)
///
/// score = round(
///     interest * 0.4 +
///     skills * 0.3 +
///     location * 0.2 +
///     preferences * 0.1
/// )
pub fn composite_score(scores: &SubScores, weights: &ScoringWeights) -> u8 {
    let total = scores.interest * weights.interest
        + scores.skills * weights.skills
        + scores.location * weights.location
        + scores.preferences * weights.preferences;

    to_percent(total)
}

#[inline]
fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
