// src/api/handlers/mod.rs
pub mod permission_handler;
