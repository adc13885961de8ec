//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongo` - MongoDB post store via the official driver

pub mod database;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, DatabaseConnections, InMemoryPostStore};

// Re-exports - MongoDB
#[cfg(feature = "mongo")]
pub use database::MongoPostStore;
