pub mod common;
pub mod leader;
pub mod user;
pub mod voter;
