//! Configuration, request models and shared state

pub mod config;
pub mod models;
pub mod name_cache;

pub use name_cache::NameCache;
