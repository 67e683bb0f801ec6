// src/repository/mod.rs
pub mod user_permission_repository;
