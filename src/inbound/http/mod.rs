pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
mod router;

pub use router::router;
