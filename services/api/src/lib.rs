//! services/api/src/lib.rs
//!
//! HTTP service for the football blog: adapters for the `DatabaseService`
//! port, configuration, error mapping and the axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
