// ABOUTME: Library root for oess-cm - the OESS backend for an NSI connection lifecycle controller.
// ABOUTME: The operator CLI is in main.rs.

pub mod adapter;
pub mod config;
pub mod error;
pub mod nrm;
pub mod provision;
pub mod types;
