pub mod catalog_connector;
pub mod queries;
pub mod mock_catalog_connector;
pub mod mysql_catalog_connector;

pub use catalog_connector::{CatalogConnector, CatalogError, CatalogRow};
pub use queries::{FilmQuery, QueryParam};
pub use mock_catalog_connector::{MockCatalogConnector, MockFilm};
pub use mysql_catalog_connector::MySqlCatalogConnector;
