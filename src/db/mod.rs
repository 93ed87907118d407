pub mod aggregate;
pub mod connection;
pub mod models;
pub mod queries;
pub mod repository;
pub mod schema;

pub use connection::*;
pub use repository::*;
