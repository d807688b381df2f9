pub mod accounts;
pub mod dashboard;
pub mod lookups;
pub mod projects;
pub mod server;
pub mod tasks;
pub mod teams;
pub mod workers;

pub use server::server_health;
