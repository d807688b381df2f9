mod models;
pub mod password;
mod ports;
mod services;

pub use models::*;
pub use ports::*;
pub use services::Service;
