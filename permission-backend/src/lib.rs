// src/lib.rs
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod shared;

// Re-export commonly used types
pub use error::{AppError, AppResult};
