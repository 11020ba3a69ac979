// catalog/catalog_connector.rs
use async_trait::async_trait;
use thiserror::Error;

use super::queries::FilmQuery;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not connect to the catalog database: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Catalog query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// One result row. Each query selects its own subset of columns, the rest are
/// left as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<u16>,
}

/// Backing store the dispatcher runs film queries against.
#[async_trait]
pub trait CatalogConnector {
    async fn fetch(&self, query: &FilmQuery) -> Result<Vec<CatalogRow>, CatalogError>;
}
