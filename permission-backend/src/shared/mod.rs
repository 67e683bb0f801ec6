// src/shared/mod.rs
pub mod types;
