//! Application services built on the ports.

mod posts;

pub use posts::{DEFAULT_OPERATION_TIMEOUT, PostGateway};
