// src/service/mod.rs
pub mod permission_service;
