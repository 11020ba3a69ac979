// catalog/mysql_catalog_connector.rs
use async_trait::async_trait;
use log::{debug, error, info, warn};
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Decode, Row, Type};
use std::convert::TryFrom;
use tokio::sync::Mutex;

use super::catalog_connector::{CatalogConnector, CatalogError, CatalogRow};
use super::queries::{FilmQuery, QueryParam};

/// Talks to the sakila database over a single MySQL connection.
///
/// The connection is opened on first use and re-opened before any query that
/// finds it gone, so a dropped server only costs the queries issued while it
/// is down.
pub struct MySqlCatalogConnector {
    options: MySqlConnectOptions,
    connection: Mutex<Option<MySqlConnection>>,
}

impl MySqlCatalogConnector {
    pub fn new(options: MySqlConnectOptions) -> Self {
        debug!(
            "Creating MySqlCatalogConnector for {}:{}",
            options.get_host(),
            options.get_port()
        );
        Self {
            options,
            connection: Mutex::new(None),
        }
    }

    /// Opens the connection ahead of the first query.
    pub async fn connect(&self) -> Result<(), CatalogError> {
        let mut guard = self.connection.lock().await;
        self.ensure_connected(&mut *guard).await.map(|_| ())
    }

    pub async fn close(&self) {
        if let Some(conn) = self.connection.lock().await.take() {
            if let Err(e) = conn.close().await {
                warn!("Error while closing catalog connection: {}", e);
            }
        }
    }

    async fn ensure_connected<'g>(
        &self,
        slot: &'g mut Option<MySqlConnection>,
    ) -> Result<&'g mut MySqlConnection, CatalogError> {
        let alive = match slot.as_mut() {
            Some(conn) => conn.ping().await.is_ok(),
            None => false,
        };
        if !alive {
            if slot.take().is_some() {
                warn!("Catalog connection lost, attempting to reconnect...");
            }
            let conn = MySqlConnection::connect_with(&self.options)
                .await
                .map_err(|e| {
                    error!("Database connection error: {}", e);
                    CatalogError::Connection(e)
                })?;
            info!("Connected to catalog database");
            *slot = Some(conn);
        }
        match slot.as_mut() {
            Some(conn) => Ok(conn),
            None => Err(CatalogError::Unavailable(String::from(
                "connection missing after connect",
            ))),
        }
    }
}

#[async_trait]
impl CatalogConnector for MySqlCatalogConnector {
    async fn fetch(&self, query: &FilmQuery) -> Result<Vec<CatalogRow>, CatalogError> {
        let mut guard = self.connection.lock().await;
        let conn = self.ensure_connected(&mut *guard).await?;

        info!(
            "SQL Query: {}",
            query.sql().split_whitespace().collect::<Vec<_>>().join(" ")
        );
        let mut statement = sqlx::query::<MySql>(query.sql());
        for param in query.params() {
            statement = match param {
                QueryParam::Text(text) => statement.bind(text),
                QueryParam::Int(value) => statement.bind(value),
            };
        }
        let rows = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(CatalogError::Query)?;
        rows.iter()
            .map(to_catalog_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(CatalogError::Query)
    }
}

fn to_catalog_row(row: &MySqlRow) -> Result<CatalogRow, sqlx::Error> {
    let release_year: Option<u64> = optional_column(row, "release_year")?;
    Ok(CatalogRow {
        title: optional_column(row, "title")?,
        description: optional_column(row, "description")?,
        genre: optional_column(row, "genre")?,
        release_year: release_year.and_then(|year| u16::try_from(year).ok()),
    })
}

// Columns a query does not select come back as None.
fn optional_column<T>(row: &MySqlRow, name: &str) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> Decode<'r, MySql> + Type<MySql>,
{
    match row.try_get::<Option<T>, _>(name) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MemoryCounterStore;
    use crate::dispatcher::QueryDispatcher;
    use std::sync::Arc;

    // Nothing listens on port 1, so every connect attempt is refused.
    fn unreachable_connector() -> MySqlCatalogConnector {
        MySqlCatalogConnector::new(
            MySqlConnectOptions::new()
                .host("127.0.0.1")
                .port(1)
                .username("nobody"),
        )
    }

    #[tokio::test]
    async fn test_failed_connect_stays_disconnected() {
        let connector = unreachable_connector();
        let query = FilmQuery::Keyword {
            keyword: "ALIEN".to_string(),
        };
        for _ in 0..2 {
            let result = connector.fetch(&query).await;
            assert!(matches!(result, Err(CatalogError::Connection(_))));
            assert!(connector.connection.lock().await.is_none());
        }
        assert!(matches!(
            connector.connect().await,
            Err(CatalogError::Connection(_))
        ));
        connector.close().await;
    }

    #[tokio::test]
    async fn test_dispatcher_retries_after_failed_connect() {
        let catalog: Arc<dyn CatalogConnector + Send + Sync> = Arc::new(unreachable_connector());
        let mut dispatcher = QueryDispatcher::new(catalog, Box::new(MemoryCounterStore::new()));
        let first = dispatcher.search_by_keyword("ALIEN").await;
        let second = dispatcher.search_by_keyword("ALIEN").await;
        assert!(first.rows.is_empty());
        assert!(second.rows.is_empty());
        assert_eq!(first.count, Some(1));
        assert_eq!(second.count, Some(2));
    }
}
