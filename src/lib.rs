pub mod config;
pub mod core;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod response;
