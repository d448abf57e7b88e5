//! Client for the BoardGameGeek XML API2 catalog.
//!
//! Three request shapes are supported: free-text search, exact-name search
//! and identifier lookup. Every response is reduced to [`Game`] records;
//! items without an identifier or a name are dropped during parsing.

use async_trait::async_trait;
use reqwest::{Client, Request, RequestBuilder, StatusCode};
use serde::Serialize;
use thiserror::Error;

mod xml;

pub use xml::parse_items;

/// Public XML API2 endpoint, used unless `BGG_API_URL` is set.
pub const DEFAULT_API_BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub year: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned {0}")]
    Status(StatusCode),

    #[error("malformed catalog response: {0}")]
    Xml(String),
}

/// The lookups the search planner needs from a catalog.
#[async_trait(?Send)]
pub trait CatalogService {
    /// Free-text search. `exact` asks the service for exact-name matching.
    async fn search_by_text(&self, query: &str, exact: bool) -> Result<Vec<Game>, CatalogError>;

    /// Identifier lookup. The service may answer with zero or more records.
    async fn lookup_by_id(&self, id: &str) -> Result<Vec<Game>, CatalogError>;
}

pub fn get_api_base_url() -> String {
    std::env::var("BGG_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

pub struct CatalogClient {
    api_base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl CatalogClient {
    pub fn new(api_base_url: String, auth_token: Option<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("bgg-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_token,
            client,
        })
    }

    pub fn search_request(&self, query: &str, exact: bool) -> Result<Request, CatalogError> {
        let url = format!("{}/search", self.api_base_url);
        let mut params = vec![("type", "boardgame"), ("query", query)];
        if exact {
            params.push(("exact", "1"));
        }

        Ok(self.authorize(self.client.get(&url).query(&params)).build()?)
    }

    pub fn lookup_request(&self, id: &str) -> Result<Request, CatalogError> {
        let url = format!("{}/thing", self.api_base_url);
        let params = [("type", "boardgame"), ("id", id)];

        Ok(self.authorize(self.client.get(&url).query(&params)).build()?)
    }

    /// The token is opaque here; it is forwarded as-is when present.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch(&self, request: Request) -> Result<Vec<Game>, CatalogError> {
        let url = request.url().clone();
        let response = self.client.execute(request).await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body = response.text().await?;
        let games = parse_items(&body)?;
        log::debug!("{} -> {} games", url, games.len());
        Ok(games)
    }
}

#[async_trait(?Send)]
impl CatalogService for CatalogClient {
    async fn search_by_text(&self, query: &str, exact: bool) -> Result<Vec<Game>, CatalogError> {
        let request = self.search_request(query, exact)?;
        self.fetch(request).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Vec<Game>, CatalogError> {
        let request = self.lookup_request(id)?;
        self.fetch(request).await
    }
}
