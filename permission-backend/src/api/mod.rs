// src/api/mod.rs
pub mod dto;
pub mod handlers;
