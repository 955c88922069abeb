use reqwest::Client;
use tracing::debug;

use crate::{config::CatalogConfig, models::{CatalogPage, MovieSummary}};

/// Upper bound on the entries returned by [`CatalogClient::recommendations`].
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Client for the external movie catalog
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl CatalogClient {
    pub fn new(http: Client, config: &CatalogConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(Client::new(), config)
    }

    /// First page of the catalog's popular movies, relayed as-is.
    pub async fn popular_movies(&self) -> Result<Vec<MovieSummary>, reqwest::Error> {
        self.fetch_results(
            "movie/popular",
            &[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", "1"),
            ],
        )
        .await
    }

    /// Catalog's "discover" listing for `genre`, cut to the first five entries.
    pub async fn recommendations(&self, genre: &str) -> Result<Vec<MovieSummary>, reqwest::Error> {
        let mut movies = self
            .fetch_results(
                "discover/movie",
                &[
                    ("api_key", self.api_key.as_str()),
                    ("with_genres", genre),
                    ("language", self.language.as_str()),
                ],
            )
            .await?;
        movies.truncate(RECOMMENDATION_LIMIT);
        Ok(movies)
    }

    async fn fetch_results(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("Catalog request: GET {}", url);

        // The query string carries the API key; errors must not echo it.
        let page = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?
            .json::<CatalogPage>()
            .await
            .map_err(reqwest::Error::without_url)?;

        debug!("Catalog returned {} results from {}", page.results.len(), resource);
        Ok(page.results)
    }
}
