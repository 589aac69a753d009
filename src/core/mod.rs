// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod reason;
pub mod region;
pub mod scoring;

pub use distance::{distance_km, haversine_distance};
pub use filters::{candidate_companies, select_companies, Candidate, CompanyRelevance, KeywordRelevance};
pub use matcher::{Matcher, MatchingOptions};
pub use reason::generate_reason;
pub use region::{region_score, score_for_distance};
pub use scoring::{
    base_score, calculate_sub_scores, composite_score, ConstantJitter, JitterSource, RngJitter, SubScores,
};
