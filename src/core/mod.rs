pub mod models;
pub mod ports;
pub mod schema;
pub mod services;
