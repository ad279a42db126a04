// ABOUTME: Library root for playground - exposes the façade, API and runtime layers.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod config;
pub mod error;
pub mod runtime;
pub mod sandbox;
pub mod types;
