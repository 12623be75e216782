pub mod aggregator;
pub mod config;
pub mod context;
pub mod fetch;
pub mod output;
pub mod records;
pub mod store;
