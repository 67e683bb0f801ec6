// src/domain/mod.rs
pub mod permission;
pub mod permission_query;
pub mod project_model;
pub mod user_model;
pub mod user_permission_model;
