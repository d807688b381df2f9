pub mod data;
pub mod forms;
mod ports;
mod services;

pub use ports::*;
pub use services::Service;
