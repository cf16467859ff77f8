pub mod config;
pub mod fetcher;
pub mod logging;
pub mod service;
pub mod store;
pub mod validate;
