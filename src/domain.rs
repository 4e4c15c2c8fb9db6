pub mod code;
pub mod error;
pub mod models;
pub mod repository;
