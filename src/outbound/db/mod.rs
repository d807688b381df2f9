pub mod auth;
pub mod error;
pub mod models;
pub mod repository;
pub mod task_manager;
