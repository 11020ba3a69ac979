// dispatcher.rs
use log::{error, info, warn};
use std::sync::Arc;

use crate::catalog::{CatalogConnector, CatalogRow, FilmQuery};
use crate::counter::CounterStore;
use crate::query_log::QueryLog;
use crate::util::Signature;

/// What a dispatched query produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub signature: Signature,
    /// Running count for the signature, `None` if it could not be persisted.
    pub count: Option<u64>,
    /// Empty both when nothing matched and when the catalog failed.
    pub rows: Vec<CatalogRow>,
}

/// Runs film queries: every query bumps its signature's counter, is written
/// to the query log, then goes to the catalog.
pub struct QueryDispatcher {
    catalog: Arc<dyn CatalogConnector + Send + Sync>,
    counter: Box<dyn CounterStore + Send>,
    query_log: Option<QueryLog>,
}

impl QueryDispatcher {
    pub fn new(
        catalog: Arc<dyn CatalogConnector + Send + Sync>,
        counter: Box<dyn CounterStore + Send>,
    ) -> Self {
        Self {
            catalog,
            counter,
            query_log: None,
        }
    }

    pub fn with_query_log(mut self, query_log: QueryLog) -> Self {
        self.query_log = Some(query_log);
        self
    }

    pub async fn search_by_keyword(&mut self, keyword: &str) -> QueryOutcome {
        self.run(FilmQuery::Keyword {
            keyword: keyword.to_string(),
        })
        .await
    }

    pub async fn search_by_genre_and_year(&mut self, genre: &str, year: i32) -> QueryOutcome {
        self.run(FilmQuery::GenreAndYear {
            genre: genre.to_string(),
            year,
        })
        .await
    }

    pub async fn list_genres_and_years(&mut self) -> QueryOutcome {
        self.run(FilmQuery::GenresAndYears).await
    }

    pub fn popular_queries(&self, n: usize) -> Vec<(Signature, u64)> {
        self.counter.top(n)
    }

    pub async fn run(&mut self, query: FilmQuery) -> QueryOutcome {
        let signature = query.signature();
        let count = match self.counter.record(&signature) {
            Ok(count) => Some(count),
            Err(e) => {
                warn!("Could not record query count for '{}': {}", signature, e);
                None
            }
        };

        if let (Some(query_log), Some(count)) = (&self.query_log, count) {
            if let Err(e) = query_log.append(query.sql(), &signature, count) {
                warn!(
                    "Could not append to query log {}: {}",
                    query_log.path().display(),
                    e
                );
            }
        }

        let rows = match self.catalog.fetch(&query).await {
            Ok(rows) => {
                info!("Query ({}) returned {} rows", signature, rows.len());
                rows
            }
            Err(e) => {
                error!("Error running {:?}: {}", query, e);
                Vec::new()
            }
        };

        QueryOutcome {
            signature,
            count,
            rows,
        }
    }
}
