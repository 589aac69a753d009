// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinates, Location, InterestCategory, CompanySize, WorkEnvironment, CommuteTolerance,
    Preferences, UserProfile, Industry, SalaryBands, JobCategory, Contact, ApplicationProcess,
    ApprenticeProgram, Company, JobPosting, ScoreBreakdown, PostingSummary, MatchResult, ScoringWeights,
};
pub use requests::{GenerateMatchesRequest, JobCompaniesQuery, LocationSearchQuery, NearbyPostingsQuery};
pub use responses::{
    GenerateMatchesResponse, HealthResponse, ErrorResponse, LocationSearchResponse, JobDetailResponse,
    CompanyDetailResponse, NearbyPosting, OfferingCompany,
};
