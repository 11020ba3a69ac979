use film_query::catalog::{CatalogConnector, MockCatalogConnector};
use film_query::counter::{FileCounterStore, MemoryCounterStore};
use film_query::dispatcher::QueryDispatcher;
use film_query::menu::Menu;
use film_query::query_log::QueryLog;
use std::sync::Arc;
use tempfile::TempDir;

pub fn memory_dispatcher(catalog: MockCatalogConnector) -> QueryDispatcher {
    let catalog: Arc<dyn CatalogConnector + Send + Sync> = Arc::new(catalog);
    QueryDispatcher::new(catalog, Box::new(MemoryCounterStore::new()))
}

/// Dispatcher over the sample catalog whose counter file and query log live in
/// `dir`.
pub fn file_dispatcher(dir: &TempDir) -> QueryDispatcher {
    let catalog: Arc<dyn CatalogConnector + Send + Sync> =
        Arc::new(MockCatalogConnector::sample());
    let counter = FileCounterStore::new(dir.path().join("query_counts.json"));
    QueryDispatcher::new(catalog, Box::new(counter))
        .with_query_log(QueryLog::new(dir.path().join("query_log.log")))
}

/// Feeds `input` to a fresh menu and returns everything it printed.
pub async fn run_menu(dispatcher: &mut QueryDispatcher, input: &str) -> String {
    let mut menu = Menu::new(input.as_bytes(), Vec::new(), 3);
    menu.run(dispatcher).await.unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}
