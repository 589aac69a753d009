// Service exports
pub mod cache;
pub mod catalog;

pub use cache::{ResultCache, CacheKey, CacheError, CacheStats};
pub use catalog::{
    CatalogError, CatalogRepository, CompanyOffer, InMemoryCatalog, LocationRepository, companies_offering, postings_near,
};
