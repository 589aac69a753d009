use std::sync::Arc;
use crate::core::{
    filters::{candidate_companies, select_companies, Candidate, CompanyRelevance, KeywordRelevance},
    reason::generate_reason,
    region::region_score,
    scoring::{base_score, calculate_sub_scores, composite_score, JitterSource},
};
use crate::models::{JobCategory, Location, MatchResult, PostingSummary, ScoringWeights, UserProfile};
use crate::services::catalog::{CatalogRepository, LocationRepository};

/// Tunables of the generation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingOptions {
    /// Out-of-region companies are considered up to this distance (inclusive)
    pub nearby_radius_km: u32,
    pub max_out_of_region: usize,
    pub companies_per_category: usize,
    pub top_categories: usize,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            nearby_radius_km: 150,
            max_out_of_region: 8,
            companies_per_category: 3,
            top_categories: 3,
        }
    }
}

/// Match generator
///
/// # Pipeline Stages
/// 1. Candidate companies (home region first, then nearby)
/// 2. Per profession: relevant company selection
/// 3. Sub-scores, composite score and reason per pair
/// 4. Profession ranking by mean score, flattened best first
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    options: MatchingOptions,
    relevance: Arc<dyn CompanyRelevance>,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, options: MatchingOptions) -> Self {
        Self {
            weights,
            options,
            relevance: Arc::new(KeywordRelevance),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), MatchingOptions::default())
    }

    /// Replace the company relevance policy
    pub fn with_relevance(mut self, relevance: Arc<dyn CompanyRelevance>) -> Self {
        self.relevance = relevance;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn options(&self) -> &MatchingOptions {
        &self.options
    }

    /// Generate the ranked match list for a profile
    ///
    /// Returns an empty list when the profile has no resolved location.
    /// All randomness is drawn from `jitter`, so a seeded source gives
    /// reproducible results.
    pub fn generate_matches<C, J>(
        &self,
        profile: &UserProfile,
        catalog: &C,
        jitter: &mut J,
    ) -> Vec<MatchResult>
    where
        C: CatalogRepository + LocationRepository + ?Sized,
        J: JitterSource + ?Sized,
    {
        let Some(user_location) = profile.location.as_ref() else {
            tracing::debug!("Profile has no location, no matches generated");
            return Vec::new();
        };

        let candidates = candidate_companies(
            catalog,
            catalog.companies(),
            user_location,
            self.options.nearby_radius_km,
            self.options.max_out_of_region,
        );

        tracing::debug!(
            postal_code = %user_location.postal_code,
            region = %user_location.region,
            candidates = candidates.len(),
            "Candidate companies resolved"
        );

        let mut groups: Vec<(f64, Vec<MatchResult>)> = catalog
            .job_categories()
            .iter()
            .map(|category| {
                let selected = select_companies(
                    &candidates,
                    category.industry,
                    self.relevance.as_ref(),
                    self.options.companies_per_category,
                );
                let matches: Vec<MatchResult> = selected
                    .into_iter()
                    .map(|candidate| self.score_pair(profile, user_location, category, candidate, catalog, jitter))
                    .collect();
                (mean_score(&matches), matches)
            })
            .filter(|(_, matches)| !matches.is_empty())
            .collect();

        // Stable sort keeps catalog order between equal means
        groups.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        groups.truncate(self.options.top_categories);

        let results: Vec<MatchResult> = groups
            .into_iter()
            .flat_map(|(_, mut matches)| {
                matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
                matches
            })
            .collect();

        tracing::debug!(results = results.len(), "Matches generated");
        results
    }

    fn score_pair<C, J>(
        &self,
        profile: &UserProfile,
        user_location: &Location,
        category: &JobCategory,
        candidate: &Candidate<'_>,
        catalog: &C,
        jitter: &mut J,
    ) -> MatchResult
    where
        C: CatalogRepository + ?Sized,
        J: JitterSource + ?Sized,
    {
        let company = candidate.company;
        let location_score = region_score(user_location, candidate.location);

        let sub_scores = calculate_sub_scores(base_score(profile, category.industry), location_score, jitter);
        let match_score = composite_score(&sub_scores, &self.weights);
        let distance = format!("{} km", candidate.distance_km);
        let ai_reason = generate_reason(profile, &distance, match_score, jitter);

        let posting = catalog.posting_for(&category.id, &company.id);
        let salary = posting
            .map(|posting| posting.salary_range.clone())
            .unwrap_or_else(|| category.average_salary.apprentice.clone());
        let open_positions = company
            .current_openings
            .unwrap_or_else(|| 1 + jitter.pick(8) as u8);

        MatchResult {
            id: format!("{}:{}", category.id, company.id),
            category_id: category.id.clone(),
            title: category.title.clone(),
            company_id: company.id.clone(),
            company: company.name.clone(),
            location: candidate.location.city.clone(),
            postal_code: candidate.location.postal_code.clone(),
            distance,
            distance_km: candidate.distance_km,
            match_score,
            scores: sub_scores.breakdown(),
            ai_reason,
            salary,
            open_positions,
            company_size: company.size_label(),
            industry: category.industry,
            posting: posting.map(PostingSummary::from),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn mean_score(matches: &[MatchResult]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    let total: u32 = matches.iter().map(|m| u32::from(m.match_score)).sum();
    f64::from(total) / matches.len() as f64
}
