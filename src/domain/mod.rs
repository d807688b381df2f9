pub mod auth;
pub mod session;
pub mod task_manager;
