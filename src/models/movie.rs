use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a catalog result list, kept exactly as the catalog sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieSummary(pub Value);

/// Paged envelope returned by the catalog's list resources.
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    pub results: Vec<MovieSummary>,
}
