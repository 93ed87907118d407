//! Multi-tenant shop and product catalog served over HTTP.
//!
//! Requests flow handler → service → repository; the repository owns every
//! statement against Postgres.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod service;
pub mod telemetry;

pub use error::{PersistenceError, ShopError};
