//! Post store implementations and connection management.

mod connections;
mod memory;

#[cfg(feature = "mongo")]
mod document;
#[cfg(feature = "mongo")]
mod mongo_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use memory::InMemoryPostStore;

#[cfg(feature = "mongo")]
pub use connections::ensure_indexes;
#[cfg(feature = "mongo")]
pub use document::{POSTS_COLLECTION, PostDocument};
#[cfg(feature = "mongo")]
pub use mongo_repo::MongoPostStore;
