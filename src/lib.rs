//! YachtCash Core - tenant resolution and access control
//!
//! This crate provides the HTTP API core for the YachtCash platform:
//! per-request tenant resolution, role-based authorization, and the
//! tenant-scoped endpoints built on top of them.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod tenancy;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
