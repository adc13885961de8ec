//! # Blog Core
//!
//! The domain layer of the blog backend.
//! Post entities, the error taxonomy, the query builder and the store gateway.
//! Storage backends live in `blog-infra` and plug in through [`ports::PostStore`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod service;

pub use error::{ErrorKind, PostError, WrapErr};
pub use service::PostGateway;
