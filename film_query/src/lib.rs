pub mod catalog;
pub mod config;
pub mod counter;
pub mod dispatcher;
pub mod menu;
pub mod query_log;
pub mod util;
